//! Base Generator trait and supporting types.

use async_trait::async_trait;
use di_protocol::analytics_models::TokenUsage;
use thiserror::Error;

/// Raw result of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Completion text, expected to hold a JSON object.
    pub content: String,

    /// Token usage, when the backend reported it.
    pub usage: Option<TokenUsage>,

    /// Model name as reported by the backend.
    pub model: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait Generator: Send + Sync {
    /// The configured model name.
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError>;
}

/// Hooks fired around every generation call.
pub trait CallObserver: Send {
    /// Fired before the request is issued.
    fn on_call_start(&mut self, model: &str);

    /// Fired only when the call returned a completion.
    fn on_call_end(&mut self, generation: &Generation);
}

/// Issue one generation call bracketed by `observer`.
///
/// A failed call fires `on_call_start` only, so it is counted without
/// contributing tokens.
pub async fn observe_generation(
    generator: &dyn Generator,
    prompt: &str,
    observer: &mut dyn CallObserver,
) -> Result<Generation, LlmError> {
    observer.on_call_start(generator.model());
    let generation = generator.generate(prompt).await?;
    observer.on_call_end(&generation);
    Ok(generation)
}
