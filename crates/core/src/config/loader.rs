//! Configuration file loader for `.doc-insight/` directory structure.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.doc-insight/` directory, including:
//! - `config.toml`: Global settings
//! - `prompts/*.md`: Stage prompt templates with YAML front matter
//!
//! The environment is consulted here and nowhere else: the API key comes from
//! the variable named by `llm.api-key-env`, and [`MODEL_ENV`] overrides the
//! configured model.

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use crate::config::prompts::{parse_prompt_template, PromptSet};
use di_protocol::config_models::GlobalConfig;
use di_protocol::prompt_models::PromptTemplate;
use std::path::Path;
use walkdir::WalkDir;

/// Name of the project configuration directory.
pub const CONFIG_DIR: &str = ".doc-insight";

/// Environment variable overriding `llm.model`.
pub const MODEL_ENV: &str = "DOC_INSIGHT_MODEL";

/// Loads all configuration from the `.doc-insight/` directory and the
/// process environment.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.doc-insight/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. If directories or files
/// are missing, defaults are used rather than returning an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML or Markdown front matter)
/// - A prompt template names an unknown stage or has an empty body
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    load_config_with_env(root, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with_env<F>(root: &Path, env: F) -> ConfigResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let di_dir = root.join(CONFIG_DIR);

    let mut global = if di_dir.exists() {
        load_global_config(&di_dir)?
    } else {
        GlobalConfig::default()
    };
    apply_env(&mut global, env);

    let mut prompts = PromptSet::embedded()?;
    if di_dir.exists() {
        for template in load_prompt_overrides(&di_dir)? {
            prompts = prompts.with_override(template);
        }
    }

    Ok(AppConfig {
        root: root.to_path_buf(),
        global,
        prompts,
    })
}

fn apply_env<F>(global: &mut GlobalConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    global.llm.api_key = non_empty(&global.llm.api_key_env);
    if let Some(model) = non_empty(MODEL_ENV) {
        global.llm.model = model;
    }
}

/// Loads global configuration from `config.toml`.
fn load_global_config(di_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = di_dir.join("config.toml");

    // If config.toml doesn't exist, return default
    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path,
            source,
        })?;

    Ok(config)
}

/// Loads prompt overrides from `prompts/*.md`.
fn load_prompt_overrides(di_dir: &Path) -> ConfigResult<Vec<PromptTemplate>> {
    let prompts_dir = di_dir.join("prompts");

    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut templates = Vec::new();

    // Sorted so that duplicates for one stage resolve deterministically (last file wins)
    for entry in WalkDir::new(&prompts_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::PromptScan {
            path: prompts_dir.clone(),
            source,
        })?;

        let path = entry.path();

        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        templates.push(parse_prompt_template(path, &content)?);
    }

    Ok(templates)
}
