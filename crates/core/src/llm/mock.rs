//! Mock generator implementation for testing.

use crate::llm::base::{Generation, Generator, LlmError};
use async_trait::async_trait;
use di_protocol::analytics_models::TokenUsage;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

pub const MOCK_MODEL: &str = "mock/scripted";

/// Serves scripted completions in call order.
///
/// Every successful completion reports the same usage (100 prompt and 50
/// completion tokens unless changed with [`MockGenerator::with_usage`]).
/// Once the script is exhausted every call fails.
pub struct MockGenerator {
    model: String,
    usage: Option<TokenUsage>,
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            model: MOCK_MODEL.to_string(),
            usage: Some(TokenUsage::new(100, 50)),
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Well-formed responses for the four stages, in pipeline order.
    pub fn success() -> Self {
        Self::new(vec![
            Ok(r#"{"document_type": "Contract"}"#.to_string()),
            Ok(
                r#"{"sections": {"Parties": "Acme Corp and Globex Ltd", "Term": "Twelve months from signature"}}"#
                    .to_string(),
            ),
            Ok(
                r#"{"summary": "A twelve month services agreement between Acme Corp and Globex Ltd."}"#
                    .to_string(),
            ),
            Ok(
                r#"{"insights": ["Risk: No termination clause", "Question: Who owns the deliverables?", "Action: Review the payment schedule"]}"#
                    .to_string(),
            ),
        ])
    }

    /// Every call fails with a backend error.
    pub fn failing() -> Self {
        Self::new(
            (0..4)
                .map(|_| {
                    Err(LlmError::Api {
                        status: 503,
                        body: "mock backend unavailable".to_string(),
                    })
                })
                .collect(),
        )
    }

    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(content)) => Ok(Generation {
                content,
                usage: self.usage,
                model: self.model.clone(),
            }),
            Some(Err(e)) => Err(e),
            None => Err(LlmError::Transport(
                "mock generator has no scripted response left".to_string(),
            )),
        }
    }
}
