//! Booster Forge command-line entry point.

use std::error::Error;
use std::io::{self, Write};

use booster_cli::config::CliConfig;
use booster_cli::report;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so the report on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .json()
        .with_writer(io::stderr)
        .init();

    let config = CliConfig::from_env()?;
    tracing::info!(?config, "starting booster run");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::run(&config, &mut out)?;
    out.flush()?;

    Ok(())
}
