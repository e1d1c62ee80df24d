//! Pipeline execution engine.
//!
//! The PipelineEngine walks the fixed phase sequence, running one stage per
//! phase and bracketing each with the execution tracker. Stage failures never
//! change control flow: every run reaches `Done` with one stage record per
//! stage.

use crate::analytics::execution::ExecutionTracker;
use crate::analytics::usage::UsageTracker;
use crate::config::prompts::PromptSet;
use crate::llm::base::Generator;
use crate::stages::{execute_stage, input_snapshot, output_snapshot, StageContext};
use crate::state::run::{advance_phase, complete_run, finish_stage, forward_logs, start_run};
use di_protocol::analytics_models::Metadata;
use di_protocol::config_models::StageLimits;
use di_protocol::events::Event;
use di_protocol::run_models::{RunState, StageKind};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

/// Everything a finished run hands back: the final state and the trackers
/// that observed it.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub state: RunState,
    pub execution: ExecutionTracker,
    pub usage: UsageTracker,
}

/// The main pipeline execution engine.
///
/// Holds no per-run state; one engine can serve concurrent runs, each of
/// which gets its own trackers.
pub struct PipelineEngine {
    generator: Arc<dyn Generator>,
    prompts: PromptSet,
    limits: StageLimits,
}

impl PipelineEngine {
    /// Create a new PipelineEngine.
    ///
    /// # Arguments
    ///
    /// * `generator` - Backend used for every stage's generation call
    /// * `prompts` - One prompt template per stage
    /// * `limits` - Input caps applied before each call
    pub fn new(generator: Arc<dyn Generator>, prompts: PromptSet, limits: StageLimits) -> Self {
        Self {
            generator,
            prompts,
            limits,
        }
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    /// Execute the four stages over `raw_text` and return the final state.
    ///
    /// This is the main entry point for a run. It:
    /// 1. Seeds the run state and emits `RunStarted`
    /// 2. Runs each phase's stage, bracketed by `start_stage`/`end_stage`
    /// 3. Forwards the stage's log line and its finalized record as events
    /// 4. Advances unconditionally until `Done` and emits `RunCompleted`
    ///
    /// # Arguments
    ///
    /// * `raw_text` - Extracted document text; callers reject empty text first
    /// * `filename` - Source file name for the seed log line
    /// * `session_id` - Identifier stamped on every event
    /// * `events_tx` - Channel for progress events
    pub async fn run(
        &self,
        raw_text: String,
        filename: &str,
        session_id: &str,
        events_tx: &Sender<Event>,
    ) -> PipelineOutcome {
        let mut execution = ExecutionTracker::new();
        let mut usage = UsageTracker::new();
        let ctx = StageContext {
            generator: self.generator.as_ref(),
            prompts: &self.prompts,
            limits: &self.limits,
        };

        let mut run = start_run(session_id, raw_text, filename, events_tx).await;

        while let Some(stage) = run.phase.stage() {
            if let Err(e) = execution.start_stage(
                stage.name(),
                &input_snapshot(stage, &run.state),
                self.start_metadata(stage),
            ) {
                tracing::warn!(%stage, error = %e, "could not open stage record");
            }

            let logs_before = run.state.logs.len();
            let outcome = execute_stage(stage, &mut run.state, ctx, &mut usage).await;
            forward_logs(&run, logs_before, events_tx).await;

            match execution.end_stage(
                &output_snapshot(stage, &run.state),
                outcome.success,
                outcome.error,
                outcome.metadata,
            ) {
                Ok(record) => finish_stage(&run, stage, record, events_tx).await,
                Err(e) => tracing::warn!(%stage, error = %e, "could not close stage record"),
            }

            advance_phase(&mut run, events_tx).await;
        }

        complete_run(&run, events_tx).await;
        tracing::info!(
            session_id,
            stages = execution.history().len(),
            api_calls = usage.record().api_call_count,
            "run completed"
        );

        PipelineOutcome {
            state: run.state,
            execution,
            usage,
        }
    }

    fn start_metadata(&self, stage: StageKind) -> Metadata {
        let mut metadata = Metadata::from([("model".to_string(), json!(self.generator.model()))]);
        let limit = match stage {
            StageKind::Classifier => Some(self.limits.classifier_chars),
            StageKind::Extractor => Some(self.limits.extractor_chars),
            StageKind::Summarizer => Some(self.limits.summarizer_chars),
            StageKind::InsightGenerator => None,
        };
        if let Some(limit) = limit {
            metadata.insert("char_limit".to_string(), json!(limit));
        }
        metadata
    }
}
