//! Gradeviz CLI - fetch and chart identifier-keyed statistics.
//!
//! Run `gradeviz` (or `gradeviz view`) to open the viewer window.
//! `gradeviz fetch <identifier>` performs one headless fetch and prints
//! the series for scripting.

use std::str::FromStr;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod config;

use config::Config;
use gradeviz_client::StatisticsClient;
use gradeviz_core::{axis_labels, StatisticsSeries};
use gradeviz_viz::GradeVizApp;

/// Gradeviz CLI - chart statistics fetched from a local endpoint.
#[derive(Parser, Debug)]
#[command(
    name = "gradeviz",
    author,
    version,
    about = "Gradeviz: fetch and chart identifier-keyed statistics",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Statistics endpoint base URL (overrides GRADEVIZ_ENDPOINT).
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Per-request timeout in seconds (overrides GRADEVIZ_TIMEOUT_SECS).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the viewer window (default command).
    View,

    /// Fetch one series headlessly and print it.
    Fetch {
        /// Identifier to query for (an empty string is allowed).
        identifier: String,

        /// Output format: table or json.
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

/// Output format for the headless fetch.
#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown format '{}' (expected table or json)", other),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .init();

    // Load configuration; CLI flags take precedence over the environment.
    let mut config = Config::load()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }

    match cli.command.unwrap_or(Commands::View) {
        Commands::View => run_viewer(config.client()),

        Commands::Fetch { identifier, format } => {
            let format: OutputFormat = format.parse()?;
            run_fetch(config.client(), &identifier, format)
        }
    }
}

/// Launch the egui viewer.
fn run_viewer(client: StatisticsClient) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 620.0])
            .with_title("Gradeviz"),
        ..Default::default()
    };

    eframe::run_native(
        "Gradeviz",
        options,
        Box::new(move |cc| {
            let app = GradeVizApp::new(cc, client)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))
}

/// Perform one fetch on a private runtime and print the series.
fn run_fetch(client: StatisticsClient, identifier: &str, format: OutputFormat) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let series = runtime.block_on(client.fetch_statistics(identifier))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        OutputFormat::Table => print_table(&series),
    }

    Ok(())
}

fn print_table(series: &StatisticsSeries) {
    if series.is_empty() {
        println!("(empty series)");
        return;
    }

    let labels = axis_labels(series.len());
    for (label, value) in labels.iter().zip(series.values()) {
        println!("{:>4}  {}", label, value);
    }
}
