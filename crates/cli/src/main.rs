//! Entry point for the `doc-insight` binary.

use clap::Parser;

mod cli;
mod commands;
mod progress;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    commands::dispatch(cli).await
}

fn init_tracing(quiet: bool, verbose: bool) -> color_eyre::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DOC_INSIGHT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| color_eyre::eyre::eyre!("failed to initialize tracing subscriber: {e}"))
}
