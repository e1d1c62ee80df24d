//! Errors raised while loading `.doc-insight/` configuration.

use di_protocol::run_models::StageKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Missing or malformed YAML front matter in a prompt file, including an
    /// unknown `stage`.
    #[error("Invalid prompt front matter in {path}: {reason}")]
    FrontMatter { path: PathBuf, reason: String },

    /// A prompt file without a template body.
    #[error("Prompt template {path} has an empty body")]
    EmptyPrompt { path: PathBuf },

    #[error("Failed to scan prompt directory {path}: {source}")]
    PromptScan {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// The prompts compiled into the binary are broken.
    #[error("Built-in prompt for {stage} is invalid: {reason}")]
    BuiltinPrompt { stage: StageKind, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
