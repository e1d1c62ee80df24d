//! Subcommand handlers.

mod analytics;
mod analyze;
mod init;
mod serve;

use crate::cli::{Cli, Commands};
use di_core::config::loader::load_config;
use di_core::config::models::AppConfig;
use std::path::Path;

pub async fn dispatch(cli: Cli) -> color_eyre::Result<()> {
    let root = cli.project_root()?;

    match cli.command {
        Commands::Init { force, minimal } => init::handle(&root, force, minimal).await,
        Commands::Serve { bind } => serve::handle(&load(&root).await?, bind).await,
        Commands::Analyze { file, json } => {
            analyze::handle(&load(&root).await?, &file, json, cli.quiet).await
        }
        Commands::Sessions { limit } => analytics::sessions(&load(&root).await?, limit).await,
        Commands::Summary => analytics::summary(&load(&root).await?).await,
    }
}

async fn load(root: &Path) -> color_eyre::Result<AppConfig> {
    let config = load_config(root).await?;
    tracing::debug!(root = %root.display(), model = %config.global.llm.model, "configuration loaded");
    Ok(config)
}
