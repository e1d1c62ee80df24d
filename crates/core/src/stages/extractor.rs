//! Extractor stage: pulls key sections relevant to the document type.

use super::decode::{decode_extractor, DEFAULT_DOCUMENT_TYPE};
use super::{
    generate_and_decode, input_metadata, render_prompt, truncate_chars, StageContext, StageOutcome,
};
use crate::analytics::usage::UsageTracker;
use di_protocol::run_models::{RunState, StageKind};
use serde_json::json;
use std::collections::BTreeMap;

pub(crate) async fn run(
    state: &mut RunState,
    ctx: StageContext<'_>,
    usage: &mut UsageTracker,
) -> StageOutcome {
    let sample = truncate_chars(&state.raw_text, ctx.limits.extractor_chars);
    let doc_type = state
        .document_type
        .as_deref()
        .unwrap_or(DEFAULT_DOCUMENT_TYPE);
    let mut metadata = input_metadata(sample);
    let prompt = render_prompt(
        ctx,
        StageKind::Extractor,
        &[("text", sample), ("doc_type", doc_type)],
    );

    match generate_and_decode(ctx, &prompt, usage, decode_extractor).await {
        Ok(output) => {
            metadata.insert("section_count".to_string(), json!(output.sections.len()));
            state.push_log(format!(
                "extractor: extracted {} key sections",
                output.sections.len()
            ));
            state.extracted_sections = output.sections;
            StageOutcome::completed(metadata)
        }
        Err(e) => {
            state.extracted_sections = BTreeMap::new();
            state.push_log(format!("extractor: extraction failed: {e}"));
            StageOutcome::failed(&e, metadata)
        }
    }
}
