//! playstore-report CLI - Google Play Store analysis report
//!
//! ```bash
//! playstore-report                  # read "google playstore data.csv", write the PDF
//! playstore-report --quiet          # only warnings and errors on stderr
//! RUST_LOG=debug playstore-report   # per-chart detail
//! ```
//!
//! Input and output paths are fixed; only logging is configurable.

use clap::Parser;
use std::io;
use std::process;

use playstore::{pipeline, ReportConfig};

#[derive(Parser)]
#[command(name = "playstore-report")]
#[command(
    about = "Clean the Google Play Store dataset and export a PDF of charts",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Install the stderr subscriber. `RUST_LOG` wins over the flags.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.quiet);

    let config = ReportConfig::default();
    let stdout = io::stdout();
    if let Err(e) = pipeline::run(&config, &mut stdout.lock()) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}
