//! Progress events emitted while a run executes.
//!
//! The pipeline driver sends these on a channel so a caller (the CLI progress
//! view, the HTTP layer's log forwarder) can follow a run as it happens.
//! Delivery is best-effort: a closed receiver never affects the run.
//!
//! Uses tagged enum serialization:
//! ```json
//! {
//!   "type": "phaseChanged",
//!   "payload": {
//!     "session_id": "0f8c...",
//!     "phase": "summarizing"
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::analytics_models::StageStatus;
use crate::run_models::{RunPhase, StageKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A run has been seeded and is about to enter its first stage.
    RunStarted {
        session_id: String,
        filename: String,
        text_length: usize,
    },

    /// The pipeline moved to a new phase.
    PhaseChanged { session_id: String, phase: RunPhase },

    /// A line was appended to the run trace.
    RunLogChunk { session_id: String, content: String },

    /// A stage record was finalized.
    StageFinished {
        session_id: String,
        stage: StageKind,
        status: StageStatus,
        duration_seconds: f64,
    },

    /// The run reached `Done`.
    RunCompleted { session_id: String },
}

impl Event {
    /// The session this event belongs to.
    pub fn session_id(&self) -> &str {
        match self {
            Event::RunStarted { session_id, .. }
            | Event::PhaseChanged { session_id, .. }
            | Event::RunLogChunk { session_id, .. }
            | Event::StageFinished { session_id, .. }
            | Event::RunCompleted { session_id } => session_id,
        }
    }
}
