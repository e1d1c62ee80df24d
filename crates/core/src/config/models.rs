//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines
//! global settings and stage prompt templates into a single configuration
//! object.

use crate::config::prompts::PromptSet;
use di_protocol::config_models::GlobalConfig;
use std::path::PathBuf;

/// Unified application configuration loaded from `.doc-insight/` directory.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Global settings
/// - `prompts/*.md`: Stage prompt overrides on top of the built-in templates
/// - Environment: API key and model override
///
/// # Example
///
/// ```rust,no_run
/// use di_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Using model {}", config.global.llm.model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Project root the configuration was loaded from.
    pub root: PathBuf,

    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// Prompt template for every stage.
    pub prompts: PromptSet,
}

impl AppConfig {
    /// The SQLite database path, resolved against the project root.
    pub fn database_path(&self) -> PathBuf {
        let path = &self.global.storage.database_path;
        if path.is_absolute() {
            path.clone()
        } else {
            self.root.join(path)
        }
    }
}
