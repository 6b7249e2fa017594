use anyhow::Context;
use clap::Parser;
use tracing::debug;

use bollo_cli::{Cli, app, logging};

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Apply the logging options from the command line.
///
/// * `--log-level` overrides `RUST_LOG`.
/// * `--quiet` closes the stderr gate; a log file still receives records.
fn configure_logging(cli: &Cli) -> anyhow::Result<()> {
    logging::init_logging()?;

    if let Some(level) = cli.log_level.as_deref() {
        logging::set_log_level(level)?;
    }
    if cli.quiet {
        logging::set_console_enabled(false);
    }
    if let Some(path) = cli.log_file.as_deref() {
        logging::enable_file_logging(path)
            .with_context(|| format!("Failed to enable file logging at {}", path.display()))?;
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    configure_logging(&cli)?;

    debug!(command = ?cli.command, "starting");
    let output = app::run(cli).await?;
    println!("{output}");

    Ok(())
}
