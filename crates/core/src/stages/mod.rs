//! The four stage executors.
//!
//! Every stage reads what earlier stages produced, sends one bounded prompt
//! to the generator and writes exactly its own output field plus one log
//! line. Failures are recovered locally: the field gets its documented
//! default, the log line carries the error, and the stage returns normally.

pub mod classifier;
pub mod decode;
pub mod extractor;
pub mod insights;
pub mod summarizer;

use crate::analytics::usage::UsageTracker;
use crate::config::prompts::PromptSet;
use crate::llm::base::{observe_generation, Generator, LlmError};
use decode::DecodeError;
use di_protocol::analytics_models::Metadata;
use di_protocol::config_models::StageLimits;
use di_protocol::run_models::{RunState, StageKind};
use serde_json::{json, Value};
use thiserror::Error;

/// Collaborators a stage needs besides the run state.
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub generator: &'a dyn Generator,
    pub prompts: &'a PromptSet,
    pub limits: &'a StageLimits,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error(transparent)]
    Generation(#[from] LlmError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// What a stage reports back to the driver for its stage record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageOutcome {
    pub success: bool,
    pub error: Option<String>,
    pub metadata: Metadata,
}

impl StageOutcome {
    fn completed(metadata: Metadata) -> Self {
        Self {
            success: true,
            error: None,
            metadata,
        }
    }

    fn failed(error: &StageError, metadata: Metadata) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            metadata,
        }
    }
}

/// Run one stage against `state`.
pub async fn execute_stage(
    stage: StageKind,
    state: &mut RunState,
    ctx: StageContext<'_>,
    usage: &mut UsageTracker,
) -> StageOutcome {
    match stage {
        StageKind::Classifier => classifier::run(state, ctx, usage).await,
        StageKind::Extractor => extractor::run(state, ctx, usage).await,
        StageKind::Summarizer => summarizer::run(state, ctx, usage).await,
        StageKind::InsightGenerator => insights::run(state, ctx, usage).await,
    }
}

/// The part of the run state `stage` reads, as recorded in its stage record.
pub fn input_snapshot(stage: StageKind, state: &RunState) -> Value {
    match stage {
        StageKind::Classifier | StageKind::Summarizer => json!({ "raw_text": state.raw_text }),
        StageKind::Extractor => json!({
            "raw_text": state.raw_text,
            "document_type": state.document_type,
        }),
        StageKind::InsightGenerator => json!({
            "document_type": state.document_type,
            "summary": state.summary,
            "extracted_sections": state.extracted_sections,
        }),
    }
}

/// The field `stage` owns, after it ran.
pub fn output_snapshot(stage: StageKind, state: &RunState) -> Value {
    let value = match stage {
        StageKind::Classifier => json!(state.document_type),
        StageKind::Extractor => json!(state.extracted_sections),
        StageKind::Summarizer => json!(state.summary),
        StageKind::InsightGenerator => json!(state.insights),
    };
    json!({ stage.output_field(): value })
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Render the prompt template for `stage`.
fn render_prompt(ctx: StageContext<'_>, stage: StageKind, vars: &[(&str, &str)]) -> String {
    crate::config::prompts::render(&ctx.prompts.get(stage).template, vars)
}

/// Issue one observed generation call and decode the completion.
async fn generate_and_decode<T>(
    ctx: StageContext<'_>,
    prompt: &str,
    usage: &mut UsageTracker,
    decode: fn(&str) -> Result<T, DecodeError>,
) -> Result<T, StageError> {
    let generation = observe_generation(ctx.generator, prompt, usage).await?;
    Ok(decode(&generation.content)?)
}

fn input_metadata(sample: &str) -> Metadata {
    Metadata::from([("input_chars".to_string(), json!(sample.chars().count()))])
}
