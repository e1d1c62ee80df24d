//! OpenAI-compatible chat completions backend (OpenRouter by default).

use crate::llm::base::{Generation, Generator, LlmError};
use async_trait::async_trait;
use di_protocol::analytics_models::TokenUsage;
use di_protocol::config_models::LlmConfig;
use serde_json::{json, Value};
use std::time::Duration;

pub struct OpenRouterGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
    api_key_env: String,
}

impl OpenRouterGenerator {
    /// Build a generator from resolved configuration.
    ///
    /// A missing API key is not an error here; calls fail with
    /// [`LlmError::MissingApiKey`] instead.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: config.api_key.clone(),
            api_key_env: config.api_key_env.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": &self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "response_format": { "type": "json_object" }
        })
    }
}

#[async_trait]
impl Generator for OpenRouterGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::MissingApiKey(self.api_key_env.clone()))?;

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response_json: Value = res
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        parse_completion(&response_json, &self.model)
    }
}

/// Pull the completion text, usage and model out of a chat completions body.
pub fn parse_completion(response: &Value, requested_model: &str) -> Result<Generation, LlmError> {
    let content = response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| LlmError::MalformedResponse("no message content in response".to_string()))?;

    let model = response
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or(requested_model)
        .to_string();

    Ok(Generation {
        content: content.to_string(),
        usage: parse_usage(response),
        model,
    })
}

/// `None` when the body carries no `usage` object.
fn parse_usage(response: &Value) -> Option<TokenUsage> {
    let usage = response.get("usage").filter(|u| u.is_object())?;
    let count = |key: &str| usage.get(key).and_then(Value::as_u64).unwrap_or(0);

    let prompt_tokens = count("prompt_tokens");
    let completion_tokens = count("completion_tokens");
    let total_tokens = usage
        .get("total_tokens")
        .and_then(Value::as_u64)
        .unwrap_or(prompt_tokens + completion_tokens);

    Some(TokenUsage {
        prompt_tokens,
        completion_tokens,
        total_tokens,
    })
}
