//! Payloads exchanged with callers of the analysis service and stored by the
//! persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::analytics_models::SessionReport;
use crate::run_models::RunState;

/// The analysis outcome of one document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub document_type: String,
    pub summary: String,
    pub key_sections: BTreeMap<String, Value>,
    pub insights: Vec<String>,

    /// The run's chronological log trace.
    pub agent_trace: Vec<String>,
}

impl AnalysisResult {
    /// Project a finished run onto the caller-facing result.
    pub fn from_run(state: &RunState) -> Self {
        Self {
            document_type: state
                .document_type
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            summary: state
                .summary
                .clone()
                .unwrap_or_else(|| "No summary available".to_string()),
            key_sections: state.extracted_sections.clone(),
            insights: state.insights.clone(),
            agent_trace: state.logs.clone(),
        }
    }
}

/// Response of `POST /analyze-pdf`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,

    pub session_id: String,

    pub analytics: SessionReport,
}

/// A stored analysis row as persisted alongside its session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub session_id: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,

    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// One row of the recent-sessions listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionListing {
    pub session_id: String,
    pub filename: String,
    pub document_type: Option<String>,
    pub start_timestamp: DateTime<Utc>,
    pub total_duration_seconds: f64,
    pub total_tokens: u64,
    pub api_calls: u64,
    pub estimated_cost_usd: f64,

    #[serde(rename = "successful_agents")]
    pub successful_stages: u64,

    #[serde(rename = "failed_agents")]
    pub failed_stages: u64,
}

/// Response of `GET /analytics/sessions`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionList {
    pub sessions: Vec<SessionListing>,
}

/// Aggregate over every stored session.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AnalyticsSummary {
    pub total_sessions: u64,
    pub total_tokens: u64,
    #[serde(rename = "total_cost")]
    pub total_cost_usd: f64,

    #[serde(rename = "average_duration")]
    pub average_duration_seconds: f64,
}
