//! Summarizer stage.

use super::decode::{decode_summary, SummaryOutput};
use super::{
    generate_and_decode, input_metadata, render_prompt, truncate_chars, StageContext, StageOutcome,
};
use crate::analytics::usage::UsageTracker;
use di_protocol::run_models::{RunState, StageKind};

pub(crate) async fn run(
    state: &mut RunState,
    ctx: StageContext<'_>,
    usage: &mut UsageTracker,
) -> StageOutcome {
    let sample = truncate_chars(&state.raw_text, ctx.limits.summarizer_chars);
    let metadata = input_metadata(sample);
    let prompt = render_prompt(ctx, StageKind::Summarizer, &[("text", sample)]);

    match generate_and_decode(ctx, &prompt, usage, decode_summary).await {
        Ok(output) => {
            state.summary = Some(output.summary);
            state.push_log("summarizer: generated summary");
            StageOutcome::completed(metadata)
        }
        Err(e) => {
            state.summary = Some(SummaryOutput::default().summary);
            state.push_log(format!("summarizer: failed to summarize: {e}"));
            StageOutcome::failed(&e, metadata)
        }
    }
}
