//! Run analytics: per-stage timing records, token usage and the end-of-run
//! session report.
//!
//! Field names on the wire follow the analytics dashboard's JSON contract
//! (`token_usage`, `agent_execution`, `thinking_process`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form metadata attached to stages and sessions.
pub type Metadata = BTreeMap<String, Value>;

/// Lifecycle status of a stage invocation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// The stage has started and has not been finalized yet.
    Running,

    /// The stage finished and produced its output.
    Completed,

    /// The stage finished but fell back to its default output.
    Failed,
}

/// Timing and outcome of one stage invocation.
///
/// Created when the stage starts and finalized when it ends; a finalized
/// record is never modified again. The ordered list of finalized records
/// forms the execution timeline of a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StageRecord {
    /// Stable stage name (`classifier`, `extractor`, ...).
    #[serde(rename = "agent_name")]
    pub stage_name: String,

    pub start_time: DateTime<Utc>,

    /// `None` only while the stage is still running.
    pub end_time: Option<DateTime<Utc>>,

    /// Wall-clock duration in seconds, never negative.
    pub duration_seconds: f64,

    /// Size proxy of the input snapshot (chars of its JSON form).
    pub input_size: u64,

    /// Size proxy of the output snapshot (chars of its JSON form).
    pub output_size: u64,

    pub status: StageStatus,

    pub success: bool,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,
}

/// Token counts reported by the backend for one generation call.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Usage with `total_tokens` derived from the two parts.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// One generation call that reported usage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CallDetail {
    pub timestamp: DateTime<Utc>,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,

    /// Model name as reported by the backend.
    #[serde(rename = "model")]
    pub model_name: String,
}

/// Token and call counters accumulated over one run.
///
/// Counters only ever grow during a run. `total_tokens` always equals the
/// sum over `call_details`; `api_calls` also counts calls that reported no
/// usage, so it may exceed `call_details.len()`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct UsageRecord {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,

    #[serde(rename = "api_calls")]
    pub api_call_count: u64,

    #[serde(rename = "call_details")]
    pub per_call_details: Vec<CallDetail>,
}

/// Usage counters plus the derived cost estimate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UsageReport {
    #[serde(flatten)]
    pub usage: UsageRecord,

    pub estimated_cost_usd: f64,
}

/// Stage records plus derived aggregate counts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    #[serde(rename = "total_agents")]
    pub total_stages: usize,

    #[serde(rename = "successful_agents")]
    pub successful_stages: usize,

    #[serde(rename = "failed_agents")]
    pub failed_stages: usize,

    /// Sum of stage durations in seconds.
    pub total_duration: f64,

    /// `total_duration / total_stages`, or 0 when no stage ran.
    pub average_duration: f64,

    #[serde(rename = "executions")]
    pub stages: Vec<StageRecord>,
}

/// One entry of the human-readable execution trace.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimelineStep {
    /// 1-based position in the run.
    pub step: usize,

    #[serde(rename = "agent")]
    pub stage_name: String,

    pub duration: f64,

    pub status: StageStatus,

    pub timestamp: DateTime<Utc>,
}

/// Ordered execution trace of a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Timeline {
    pub total_steps: usize,
    pub steps: Vec<TimelineStep>,

    /// Stage names joined in execution order, e.g.
    /// `classifier → extractor → summarizer → insight_generator`.
    pub flow: String,
}

/// Immutable end-of-run aggregate of stage records and usage counters.
///
/// Exactly one report is produced per run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionReport {
    /// Unique per run.
    pub session_id: String,

    pub start_timestamp: DateTime<Utc>,

    pub end_timestamp: DateTime<Utc>,

    pub total_duration_seconds: f64,

    /// Session metadata such as the source filename.
    #[serde(default)]
    pub metadata: Metadata,

    #[serde(rename = "token_usage")]
    pub usage: UsageReport,

    #[serde(rename = "agent_execution")]
    pub execution: ExecutionReport,

    #[serde(rename = "thinking_process")]
    pub timeline: Timeline,
}
