//! Bridges the async statistics client onto the egui frame loop.
//!
//! Fetches run on a background tokio runtime; completions travel back over
//! an mpsc channel drained at the start of every frame. The session's
//! request-sequence fence decides which completions are allowed to mutate
//! state, so overlapping fetches need no cancellation.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use gradeviz_client::StatisticsClient;
use gradeviz_core::{ApplyOutcome, FetchFailure, FetchRequest, GradeSession, RequestSeq, StatisticsSeries};
use tracing::{debug, warn};

type FetchOutcome = (RequestSeq, Result<StatisticsSeries, FetchFailure>);

/// Owns the runtime and the result channel for in-flight fetches.
pub struct FetchController {
    client: Arc<StatisticsClient>,
    runtime: tokio::runtime::Runtime,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
}

impl FetchController {
    /// Build a controller around a configured client.
    pub fn new(client: StatisticsClient) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        let (tx, rx) = channel();

        Ok(Self {
            client: Arc::new(client),
            runtime,
            tx,
            rx,
        })
    }

    /// The client this controller fetches with.
    pub fn client(&self) -> &StatisticsClient {
        &self.client
    }

    /// Spawn the fetch for a submitted request.
    ///
    /// The completion wakes the UI with `request_repaint`, so no frame is
    /// wasted polling while the request is in flight.
    pub fn trigger(&self, request: FetchRequest, ctx: egui::Context) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();

        debug!(seq = request.seq.0, identifier = %request.identifier, "fetch_triggered");

        self.runtime.spawn(async move {
            let result = client
                .fetch_statistics(&request.identifier)
                .await
                .map_err(|e| e.to_failure());

            if let Err(failure) = &result {
                warn!(seq = request.seq.0, %failure, "fetch_failed");
            }

            // The receiver only disappears when the app shuts down.
            let _ = tx.send((request.seq, result));
            ctx.request_repaint();
        });
    }

    /// Drain finished fetches into the session.
    ///
    /// Returns true when anything was applied (the frame should re-read
    /// the session). Stale results are logged and dropped.
    pub fn poll(&self, session: &mut GradeSession) -> bool {
        let mut changed = false;

        while let Ok((seq, result)) = self.rx.try_recv() {
            match session.apply_result(seq, result) {
                ApplyOutcome::Applied => changed = true,
                ApplyOutcome::Stale => {
                    debug!(seq = seq.0, "stale_fetch_ignored");
                }
            }
        }

        changed
    }
}
