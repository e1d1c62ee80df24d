//! Runtime state of a single document analysis run.
//!
//! A run threads one [`RunState`] through four fixed stages. The driver walks
//! the [`RunPhase`] machine; each non-terminal phase maps to exactly one
//! [`StageKind`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The four analysis stages, in execution order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Identifies the document type from the opening text.
    Classifier,

    /// Pulls key sections relevant to the document type.
    Extractor,

    /// Produces a concise summary of the document.
    Summarizer,

    /// Derives questions, risks and follow-up actions.
    InsightGenerator,
}

impl StageKind {
    /// All stages in pipeline order.
    pub const ALL: [StageKind; 4] = [
        StageKind::Classifier,
        StageKind::Extractor,
        StageKind::Summarizer,
        StageKind::InsightGenerator,
    ];

    /// Stable name used in stage records, prompt front matter and the timeline.
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Classifier => "classifier",
            StageKind::Extractor => "extractor",
            StageKind::Summarizer => "summarizer",
            StageKind::InsightGenerator => "insight_generator",
        }
    }

    /// Name of the RunState field this stage owns.
    pub fn output_field(self) -> &'static str {
        match self {
            StageKind::Classifier => "document_type",
            StageKind::Extractor => "extracted_sections",
            StageKind::Summarizer => "summary",
            StageKind::InsightGenerator => "insights",
        }
    }

    /// Parse a stage from its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.name() == name)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Phases of the linear pipeline state machine.
///
/// Transitions are unconditional:
/// Classifying -> Extracting -> Summarizing -> GeneratingInsights -> Done
///
/// `Done` is reached whether or not individual stages succeeded; stage
/// failures are visible in the run content, never in the control flow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RunPhase {
    Classifying,
    Extracting,
    Summarizing,
    GeneratingInsights,
    Done,
}

impl RunPhase {
    /// The phase that follows this one. `Done` is absorbing.
    pub fn next(self) -> Self {
        match self {
            RunPhase::Classifying => RunPhase::Extracting,
            RunPhase::Extracting => RunPhase::Summarizing,
            RunPhase::Summarizing => RunPhase::GeneratingInsights,
            RunPhase::GeneratingInsights | RunPhase::Done => RunPhase::Done,
        }
    }

    /// The stage executed while in this phase, `None` once done.
    pub fn stage(self) -> Option<StageKind> {
        match self {
            RunPhase::Classifying => Some(StageKind::Classifier),
            RunPhase::Extracting => Some(StageKind::Extractor),
            RunPhase::Summarizing => Some(StageKind::Summarizer),
            RunPhase::GeneratingInsights => Some(StageKind::InsightGenerator),
            RunPhase::Done => None,
        }
    }

    pub fn is_done(self) -> bool {
        self == RunPhase::Done
    }
}

/// The mutable record threaded through every stage of one run.
///
/// Owned by the pipeline driver for the lifetime of the run and mutated by
/// one stage at a time. Each stage writes only its own output field plus a
/// single line in `logs`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RunState {
    /// Text extracted from the uploaded document.
    pub raw_text: String,

    /// Set by the classifier stage.
    pub document_type: Option<String>,

    /// Set by the extractor stage. Key order carries no meaning.
    pub extracted_sections: BTreeMap<String, Value>,

    /// Set by the summarizer stage.
    pub summary: Option<String>,

    /// Set by the insight generator stage.
    pub insights: Vec<String>,

    /// Append-only, chronological trace of the run.
    pub logs: Vec<String>,
}

impl RunState {
    /// Create the initial state for a run, including the seed log entry.
    pub fn seed(raw_text: String, filename: &str) -> Self {
        let seed_line = format!(
            "system: received {filename}, {} chars of text",
            raw_text.chars().count()
        );
        Self {
            raw_text,
            logs: vec![seed_line],
            ..Self::default()
        }
    }

    /// Append one line to the run trace.
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }
}
