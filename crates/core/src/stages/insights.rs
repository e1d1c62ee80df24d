//! Insight generator stage: questions, risks and follow-up actions.
//!
//! Works from the upstream outputs only, never from the raw text.

use super::decode::{decode_insights, DEFAULT_DOCUMENT_TYPE};
use super::{generate_and_decode, render_prompt, StageContext, StageOutcome};
use crate::analytics::usage::UsageTracker;
use di_protocol::analytics_models::Metadata;
use di_protocol::run_models::{RunState, StageKind};
use serde_json::json;

pub(crate) async fn run(
    state: &mut RunState,
    ctx: StageContext<'_>,
    usage: &mut UsageTracker,
) -> StageOutcome {
    let doc_type = state
        .document_type
        .as_deref()
        .unwrap_or(DEFAULT_DOCUMENT_TYPE);
    let summary = state.summary.as_deref().unwrap_or_default();
    let sections = serde_json::to_string(&state.extracted_sections).unwrap_or_default();
    let metadata = Metadata::from([(
        "input_chars".to_string(),
        json!(summary.chars().count() + sections.chars().count()),
    )]);
    let prompt = render_prompt(
        ctx,
        StageKind::InsightGenerator,
        &[
            ("doc_type", doc_type),
            ("summary", summary),
            ("sections", sections.as_str()),
        ],
    );

    match generate_and_decode(ctx, &prompt, usage, decode_insights).await {
        Ok(output) => {
            state.push_log(format!(
                "insight_generator: generated {} insights",
                output.insights.len()
            ));
            state.insights = output.insights;
            StageOutcome::completed(metadata)
        }
        Err(e) => {
            state.insights = Vec::new();
            state.push_log(format!("insight_generator: failed to generate insights: {e}"));
            StageOutcome::failed(&e, metadata)
        }
    }
}
