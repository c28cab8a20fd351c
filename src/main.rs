//! CLI entry point for grid anomaly analysis

use clap::Parser;
use gridscan::io::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> gridscan::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    cli.run()
}
