//! Core domain types shared across the gradeviz workspace.
//!
//! Everything here is UI- and I/O-free: the statistics series, the fetch
//! session state machine with request-sequence fencing, and the hover
//! transition state the viewer animates with.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// =============================================================================
// Statistics Series
// =============================================================================

/// Ordered numeric series bound to the chart's single bar series.
///
/// Insertion order is the server's response order. The series is only ever
/// replaced wholesale, never incrementally mutated.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatisticsSeries(Vec<f64>);

impl StatisticsSeries {
    /// Create a series from raw values.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Build a series from a decoded JSON array, coercing numeric strings.
    ///
    /// The endpoint promises "numbers or number-coercible values": plain
    /// JSON numbers and strings that parse as `f64` are accepted; anything
    /// else is rejected with the offending index.
    pub fn from_json_array(values: &[Value]) -> Result<Self, String> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                coerce_number(value)
                    .ok_or_else(|| format!("element {} is not a number: {}", index, value))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Borrow the underlying values.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Number of data points.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the series holds no data points.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest value in the series, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.0.iter().copied().reduce(f64::max)
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Category labels for a series of the given length.
///
/// A seven-point series keeps the deployment's weekday labeling; any other
/// length falls back to one-based index labels.
pub fn axis_labels(len: usize) -> Vec<String> {
    if len == WEEKDAY_LABELS.len() {
        WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect()
    } else {
        (1..=len).map(|i| i.to_string()).collect()
    }
}

/// Weekday labels used when the series has exactly seven points.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

// =============================================================================
// Fetch State
// =============================================================================

/// Why a fetch did not produce a usable series.
///
/// The three kinds are surfaced separately so the viewer can tell "could
/// not reach server" apart from "server returned invalid data".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// Transport-level failure: connect, timeout, or mid-transfer error.
    #[error("could not reach server: {message}")]
    Unreachable { message: String },

    /// The server answered with a non-success HTTP status.
    #[error("server returned HTTP {code}")]
    BadStatus { code: u16 },

    /// The body was not JSON, or not an array of number-coercible values.
    #[error("server returned invalid data: {message}")]
    InvalidData { message: String },
}

impl FetchFailure {
    /// Short heading for the error banner.
    pub fn label(&self) -> &'static str {
        match self {
            FetchFailure::Unreachable { .. } => "Network error",
            FetchFailure::BadStatus { .. } => "Server error",
            FetchFailure::InvalidData { .. } => "Invalid data",
        }
    }
}

/// Lifecycle of the fetch-and-render session.
///
/// Placeholder-vs-chart visibility is driven by this enum, never by
/// whether the identifier happens to be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Nothing submitted yet; the placeholder prompt is shown.
    #[default]
    Idle,
    /// A request is outstanding.
    Loading,
    /// The most recent request replaced the series.
    Loaded,
    /// The most recent request failed; the previous series is untouched.
    Failed,
}

impl FetchPhase {
    pub fn label(&self) -> &'static str {
        match self {
            FetchPhase::Idle => "idle",
            FetchPhase::Loading => "loading",
            FetchPhase::Loaded => "loaded",
            FetchPhase::Failed => "failed",
        }
    }
}

/// Monotonic fencing token attached to every fetch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub u64);

/// A fetch the session has asked the I/O layer to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Fencing token; only the latest issued token may mutate the session.
    pub seq: RequestSeq,
    /// Raw identifier text, passed through unvalidated (empty allowed).
    pub identifier: String,
}

/// Whether an incoming result was accepted or fenced out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The result carried the latest issued token and mutated the session.
    Applied,
    /// A newer request was issued since; nothing changed.
    Stale,
}

// =============================================================================
// Grade Session
// =============================================================================

/// UI-independent state machine for the fetch-and-render flow.
///
/// Holds the input cell, the last submitted identifier, the current series
/// and phase, and the request-sequence fence. Concurrency policy: *last
/// request issued wins* — overlapping fetches may both run, but only the
/// result matching the most recently issued [`RequestSeq`] is applied.
#[derive(Debug, Default, Clone)]
pub struct GradeSession {
    input: String,
    submitted: Option<String>,
    phase: FetchPhase,
    series: StatisticsSeries,
    failure: Option<FetchFailure>,
    next_seq: u64,
    latest_seq: Option<RequestSeq>,
    loaded_once: bool,
}

impl GradeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current input cell contents.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Overwrite the input cell; called on every keystroke, no constraints.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Mutable access for binding the cell directly to a text widget.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// Identifier of the last submitted fetch, kept for display.
    pub fn submitted(&self) -> Option<&str> {
        self.submitted.as_deref()
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// The currently displayed series.
    pub fn series(&self) -> &StatisticsSeries {
        &self.series
    }

    /// Failure of the most recent request, if it failed.
    pub fn failure(&self) -> Option<&FetchFailure> {
        self.failure.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// Whether any fetch has ever populated the series.
    ///
    /// The chart stays visible through later loading and failed states;
    /// only a session that has never loaded shows the bare placeholder.
    pub fn has_loaded(&self) -> bool {
        self.loaded_once
    }

    /// Submit the current input as a fetch request.
    ///
    /// Always dispatches, empty input included. Takes the input cell
    /// (clearing it), records the submitted identifier for display, and
    /// moves the phase to [`FetchPhase::Loading`].
    pub fn submit(&mut self) -> FetchRequest {
        let identifier = std::mem::take(&mut self.input);
        let seq = RequestSeq(self.next_seq);
        self.next_seq += 1;
        self.latest_seq = Some(seq);
        self.submitted = Some(identifier.clone());
        self.phase = FetchPhase::Loading;
        self.failure = None;
        FetchRequest { seq, identifier }
    }

    /// Apply a finished fetch, subject to the sequence fence.
    ///
    /// Results for anything but the latest issued request return
    /// [`ApplyOutcome::Stale`] and leave every cell untouched.
    pub fn apply_result(
        &mut self,
        seq: RequestSeq,
        result: Result<StatisticsSeries, FetchFailure>,
    ) -> ApplyOutcome {
        if self.latest_seq != Some(seq) {
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(series) => {
                self.series = series;
                self.phase = FetchPhase::Loaded;
                self.failure = None;
                self.loaded_once = true;
            }
            Err(failure) => {
                // Previous series stays as it was, stale or empty.
                self.phase = FetchPhase::Failed;
                self.failure = Some(failure);
            }
        }

        ApplyOutcome::Applied
    }
}

// =============================================================================
// Hover Transition
// =============================================================================

/// Two-state hover machine with an animated enter/exit transition.
///
/// `shown` is the target state (pointer over the trigger box); `progress`
/// chases it at `speed` units per second and drives the fade/slide in the
/// viewer. Presentation-only: nothing else in the system observes it.
#[derive(Debug, Clone)]
pub struct HoverTransition {
    progress: f32,
    shown: bool,
    /// Transition speed in progress units per second.
    pub speed: f32,
}

impl Default for HoverTransition {
    fn default() -> Self {
        Self {
            progress: 0.0,
            shown: false,
            speed: 6.0,
        }
    }
}

impl HoverTransition {
    /// Set the target state from the pointer's hover status.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.shown = hovered;
    }

    /// Whether the target state is "shown".
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Advance the transition by delta time.
    pub fn tick(&mut self, dt: f32) {
        let target = self.target();
        let step = dt * self.speed;
        if self.progress < target {
            self.progress = (self.progress + step).min(target);
        } else {
            self.progress = (self.progress - step).max(target);
        }
    }

    /// Raw transition progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Eased opacity for the panel.
    pub fn alpha(&self) -> f32 {
        smoothstep(self.progress)
    }

    /// Remaining slide distance toward the resting position.
    pub fn slide_offset(&self, distance: f32) -> f32 {
        (1.0 - self.alpha()) * distance
    }

    /// Whether the panel should be drawn at all this frame.
    pub fn is_visible(&self) -> bool {
        self.progress > 0.0
    }

    /// Whether a repaint is needed to keep the transition moving.
    pub fn is_animating(&self) -> bool {
        self.progress != self.target()
    }

    fn target(&self) -> f32 {
        if self.shown {
            1.0
        } else {
            0.0
        }
    }
}

fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series(values: &[f64]) -> StatisticsSeries {
        StatisticsSeries::new(values.to_vec())
    }

    #[test]
    fn input_is_stored_verbatim() {
        let mut session = GradeSession::new();
        for text in ["4", "42", "42 ", "42 x", ""] {
            session.set_input(text);
            assert_eq!(session.input(), text);
        }
    }

    #[test]
    fn submit_dispatches_empty_identifier() {
        let mut session = GradeSession::new();
        let request = session.submit();
        assert_eq!(request.identifier, "");
        assert_eq!(session.phase(), FetchPhase::Loading);
    }

    #[test]
    fn submit_clears_input_and_records_identifier() {
        let mut session = GradeSession::new();
        session.set_input("42");
        let request = session.submit();

        assert_eq!(request.identifier, "42");
        assert_eq!(session.input(), "");
        assert_eq!(session.submitted(), Some("42"));
    }

    #[test]
    fn successful_result_replaces_series_wholesale() {
        let mut session = GradeSession::new();
        session.set_input("42");
        let request = session.submit();

        let outcome = session.apply_result(request.seq, Ok(series(&[1.0, 2.0, 3.0])));
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(session.series().values(), &[1.0, 2.0, 3.0]);
        assert_eq!(session.phase(), FetchPhase::Loaded);
        assert!(session.has_loaded());

        // A later fetch replaces, never appends.
        session.set_input("7");
        let request = session.submit();
        session.apply_result(request.seq, Ok(series(&[9.0])));
        assert_eq!(session.series().values(), &[9.0]);
    }

    #[test]
    fn empty_series_is_a_valid_result() {
        let mut session = GradeSession::new();
        let request = session.submit();
        session.apply_result(request.seq, Ok(series(&[])));
        assert_eq!(session.phase(), FetchPhase::Loaded);
        assert!(session.series().is_empty());
    }

    #[test]
    fn failure_preserves_previous_series() {
        let mut session = GradeSession::new();
        session.set_input("1");
        let first = session.submit();
        session.apply_result(first.seq, Ok(series(&[5.0, 6.0])));

        session.set_input("2");
        let second = session.submit();
        let outcome = session.apply_result(
            second.seq,
            Err(FetchFailure::Unreachable {
                message: "connection refused".into(),
            }),
        );

        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(session.phase(), FetchPhase::Failed);
        assert_eq!(session.series().values(), &[5.0, 6.0]);
        assert_eq!(session.failure().unwrap().label(), "Network error");
    }

    #[test]
    fn stale_result_is_fenced_out() {
        let mut session = GradeSession::new();
        session.set_input("1");
        let slow = session.submit();
        session.set_input("2");
        let fast = session.submit();

        // Fast request resolves first and is applied.
        assert_eq!(
            session.apply_result(fast.seq, Ok(series(&[2.0]))),
            ApplyOutcome::Applied
        );

        // Slow request resolves later but was superseded: nothing changes.
        assert_eq!(
            session.apply_result(slow.seq, Ok(series(&[1.0]))),
            ApplyOutcome::Stale
        );
        assert_eq!(session.series().values(), &[2.0]);
        assert_eq!(session.phase(), FetchPhase::Loaded);
    }

    #[test]
    fn latest_issued_wins_regardless_of_arrival_order() {
        let mut session = GradeSession::new();
        let first = session.submit();
        let second = session.submit();

        // Results arrive in issue order; the older one must still lose.
        assert_eq!(
            session.apply_result(first.seq, Ok(series(&[1.0]))),
            ApplyOutcome::Stale
        );
        assert_eq!(
            session.apply_result(second.seq, Ok(series(&[2.0]))),
            ApplyOutcome::Applied
        );
        assert_eq!(session.series().values(), &[2.0]);
    }

    #[test]
    fn stale_failure_does_not_clobber_loaded_phase() {
        let mut session = GradeSession::new();
        let slow = session.submit();
        let fast = session.submit();
        session.apply_result(fast.seq, Ok(series(&[3.0])));

        session.apply_result(
            slow.seq,
            Err(FetchFailure::BadStatus { code: 500 }),
        );
        assert_eq!(session.phase(), FetchPhase::Loaded);
        assert!(session.failure().is_none());
    }

    #[test]
    fn json_array_decodes_with_coercion() {
        let values = vec![json!(1), json!(2.5), json!("3.5"), json!(" 4 ")];
        let series = StatisticsSeries::from_json_array(&values).unwrap();
        assert_eq!(series.values(), &[1.0, 2.5, 3.5, 4.0]);
    }

    #[test]
    fn json_array_rejects_non_numbers() {
        let values = vec![json!(1), json!("not a number")];
        let err = StatisticsSeries::from_json_array(&values).unwrap_err();
        assert!(err.contains("element 1"), "unexpected message: {}", err);

        let values = vec![json!({"nested": true})];
        assert!(StatisticsSeries::from_json_array(&values).is_err());
    }

    #[test]
    fn axis_labels_derive_from_length() {
        assert_eq!(axis_labels(0), Vec::<String>::new());
        assert_eq!(axis_labels(3), vec!["1", "2", "3"]);
        assert_eq!(axis_labels(7)[0], "Mon");
        assert_eq!(axis_labels(7)[6], "Sun");
        assert_eq!(axis_labels(8)[7], "8");
    }

    #[test]
    fn hover_transition_settles_in_both_directions() {
        let mut hover = HoverTransition::default();
        assert!(!hover.is_visible());

        hover.set_hovered(true);
        for _ in 0..120 {
            hover.tick(1.0 / 60.0);
        }
        assert_eq!(hover.progress(), 1.0);
        assert!(!hover.is_animating());

        hover.set_hovered(false);
        for _ in 0..120 {
            hover.tick(1.0 / 60.0);
        }
        assert_eq!(hover.progress(), 0.0);
        assert!(!hover.is_visible());
    }

    #[test]
    fn hover_enter_then_immediate_leave_does_not_stick() {
        let mut hover = HoverTransition::default();
        hover.set_hovered(true);
        hover.tick(0.02);
        assert!(hover.is_visible());

        hover.set_hovered(false);
        for _ in 0..120 {
            hover.tick(1.0 / 60.0);
        }
        assert!(!hover.is_visible());
        assert!(!hover.is_animating());
    }
}
