//! Run state machine implementation.
//!
//! Functions that move a [`Run`] through its phases and emit the matching
//! progress events. Sending is best-effort: a dropped receiver never affects
//! the run.

use di_protocol::analytics_models::StageRecord;
use di_protocol::events::Event;
use di_protocol::run_models::{RunPhase, RunState, StageKind};
use tokio::sync::mpsc::Sender;

/// One run in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub session_id: String,
    pub phase: RunPhase,
    pub state: RunState,
}

/// Seed a new run in the first phase and emit its opening events.
///
/// # Arguments
///
/// * `session_id` - Identifier shared with the run's analytics session
/// * `raw_text` - Extracted document text
/// * `filename` - Source file name, recorded in the seed log line
/// * `events_tx` - Channel to send progress events
pub async fn start_run(
    session_id: &str,
    raw_text: String,
    filename: &str,
    events_tx: &Sender<Event>,
) -> Run {
    let text_length = raw_text.chars().count();
    let run = Run {
        session_id: session_id.to_string(),
        phase: RunPhase::Classifying,
        state: RunState::seed(raw_text, filename),
    };

    let _ = events_tx
        .send(Event::RunStarted {
            session_id: run.session_id.clone(),
            filename: filename.to_string(),
            text_length,
        })
        .await;
    forward_logs(&run, 0, events_tx).await;
    let _ = events_tx
        .send(Event::PhaseChanged {
            session_id: run.session_id.clone(),
            phase: run.phase,
        })
        .await;

    run
}

/// Move to the next phase and emit the transition.
pub async fn advance_phase(run: &mut Run, events_tx: &Sender<Event>) {
    run.phase = run.phase.next();
    let _ = events_tx
        .send(Event::PhaseChanged {
            session_id: run.session_id.clone(),
            phase: run.phase,
        })
        .await;
}

/// Emit every log line from index `from` onwards.
pub async fn forward_logs(run: &Run, from: usize, events_tx: &Sender<Event>) {
    for line in run.state.logs.iter().skip(from) {
        let _ = events_tx
            .send(Event::RunLogChunk {
                session_id: run.session_id.clone(),
                content: line.clone(),
            })
            .await;
    }
}

/// Emit the finalized record of `stage`.
pub async fn finish_stage(
    run: &Run,
    stage: StageKind,
    record: &StageRecord,
    events_tx: &Sender<Event>,
) {
    let _ = events_tx
        .send(Event::StageFinished {
            session_id: run.session_id.clone(),
            stage,
            status: record.status,
            duration_seconds: record.duration_seconds,
        })
        .await;
}

/// Emit completion. The run must already be in `Done`.
pub async fn complete_run(run: &Run, events_tx: &Sender<Event>) {
    debug_assert!(run.phase.is_done());
    let _ = events_tx
        .send(Event::RunCompleted {
            session_id: run.session_id.clone(),
        })
        .await;
}
