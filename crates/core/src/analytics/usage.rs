//! Token and call accounting across the generation calls of one run.

use crate::llm::base::{CallObserver, Generation};
use chrono::Utc;
use di_protocol::analytics_models::{CallDetail, UsageRecord};

/// Accumulates a [`UsageRecord`] from observed generation calls.
///
/// Every started call is counted. Only completions that carry usage metadata
/// add tokens and a call detail.
#[derive(Debug, Default, Clone)]
pub struct UsageTracker {
    record: UsageRecord,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &UsageRecord {
        &self.record
    }

    pub fn into_record(self) -> UsageRecord {
        self.record
    }

    /// Zero every counter. Only meant for use between independent runs.
    pub fn reset(&mut self) {
        self.record = UsageRecord::default();
    }
}

impl CallObserver for UsageTracker {
    fn on_call_start(&mut self, model: &str) {
        self.record.api_call_count += 1;
        tracing::debug!(model, calls = self.record.api_call_count, "generation call started");
    }

    fn on_call_end(&mut self, generation: &Generation) {
        let Some(usage) = generation.usage else {
            tracing::debug!(model = %generation.model, "generation returned no usage metadata");
            return;
        };

        self.record.prompt_tokens += usage.prompt_tokens;
        self.record.completion_tokens += usage.completion_tokens;
        self.record.total_tokens += usage.total_tokens;
        self.record.per_call_details.push(CallDetail {
            timestamp: Utc::now(),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            model_name: generation.model.clone(),
        });
    }
}
