//! Classifier stage: identifies the document type.

use super::decode::{decode_classifier, ClassifierOutput};
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
    let sample = truncate_chars(&state.raw_text, ctx.limits.classifier_chars);
    let metadata = input_metadata(sample);
    let prompt = render_prompt(ctx, StageKind::Classifier, &[("text", sample)]);

    match generate_and_decode(ctx, &prompt, usage, decode_classifier).await {
        Ok(output) => {
            state.push_log(format!(
                "classifier: identified document as {}",
                output.document_type
            ));
            state.document_type = Some(output.document_type);
            StageOutcome::completed(metadata)
        }
        Err(e) => {
            state.document_type = Some(ClassifierOutput::default().document_type);
            state.push_log(format!("classifier: failed to classify document: {e}"));
            StageOutcome::failed(&e, metadata)
        }
    }
}
