//! Native desktop runner for gradeviz-viz development.
//!
//! Run with: cargo run --package gradeviz-viz --example native
//! The endpoint can be overridden with GRADEVIZ_ENDPOINT.

use eframe::{run_native, NativeOptions};
use gradeviz_client::{StatisticsClient, DEFAULT_ENDPOINT};
use gradeviz_viz::GradeVizApp;

fn main() -> eframe::Result<()> {
    // Initialize tracing for native development
    #[cfg(debug_assertions)]
    {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(
                EnvFilter::from_default_env()
                    .add_directive("gradeviz_viz=debug".parse().unwrap())
                    .add_directive("gradeviz_client=debug".parse().unwrap()),
            )
            .init();
    }

    let endpoint =
        std::env::var("GRADEVIZ_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 620.0])
            .with_title("Gradeviz - Development"),
        ..Default::default()
    };

    run_native(
        "Gradeviz",
        options,
        Box::new(move |cc| {
            let app = GradeVizApp::new(cc, StatisticsClient::new(endpoint))?;
            Ok(Box::new(app))
        }),
    )
}
