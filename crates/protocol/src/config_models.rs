//! Global configuration models for `.doc-insight/config.toml`.
//!
//! Every section is optional; missing keys fall back to the defaults below.
//! Secrets never live in the file: the API key is resolved by the loader
//! from the environment variable named in `llm.api-key-env`.

use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Represents global settings from `.doc-insight/config.toml`.
///
/// # Example
///
/// ```toml
/// # .doc-insight/config.toml
/// [llm]
/// model = "google/gemini-2.0-flash-001"
/// temperature = 0.1
///
/// [pricing.models."openai/gpt-4o-mini"]
/// prompt-per-1k = 0.00015
/// completion-per-1k = 0.0006
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub limits: StageLimits,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Settings for the remote text-generation backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,

    /// Model identifier sent with every request.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// Resolved API key. Never read from or written to the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "google/gemini-2.0-flash-001".to_string(),
            temperature: 0.1,
            timeout_secs: 120,
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
        }
    }
}

/// Linear per-1k-token prices for one model, in USD.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ModelPricing {
    pub prompt_per_1k: f64,
    pub completion_per_1k: f64,
}

impl Default for ModelPricing {
    /// Approximate OpenRouter rates for gemini-2.0-flash.
    fn default() -> Self {
        Self {
            prompt_per_1k: 0.00001,
            completion_per_1k: 0.00003,
        }
    }
}

/// Cost model configuration: a default rate plus per-model overrides.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct PricingConfig {
    pub default: ModelPricing,
    pub models: BTreeMap<String, ModelPricing>,
}

impl PricingConfig {
    /// Rates for `model`, falling back to the default rate.
    pub fn for_model(&self, model: &str) -> ModelPricing {
        self.models.get(model).copied().unwrap_or(self.default)
    }
}

/// Input caps (in characters) applied before each generation call.
///
/// These bound cost and latency; they are not semantic truncations.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct StageLimits {
    pub classifier_chars: usize,
    pub extractor_chars: usize,
    pub summarizer_chars: usize,
}

impl Default for StageLimits {
    fn default() -> Self {
        Self {
            classifier_chars: 3000,
            extractor_chars: 10_000,
            summarizer_chars: 15_000,
        }
    }
}

/// HTTP server settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,

    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

/// Persistence settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    /// SQLite database file. Relative paths resolve against the project root.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("doc_insight.db"),
        }
    }
}
