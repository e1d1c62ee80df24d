//! Session aggregation: folds stage records and usage into one report.

use crate::analytics::pricing::estimate_cost;
use chrono::{DateTime, Utc};
use di_protocol::analytics_models::{
    ExecutionReport, Metadata, SessionReport, StageRecord, Timeline, TimelineStep, UsageRecord,
    UsageReport,
};
use di_protocol::config_models::ModelPricing;
use serde_json::Value;
use std::time::Instant;
use uuid::Uuid;

/// Identity and wall-clock bounds of one analytics session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionWindow {
    pub session_id: String,
    pub start_timestamp: DateTime<Utc>,
    pub end_timestamp: DateTime<Utc>,
    pub total_duration_seconds: f64,
    pub metadata: Metadata,
}

/// An open analytics session for one run.
#[derive(Debug)]
pub struct AnalyticsSession {
    session_id: String,
    start_timestamp: DateTime<Utc>,
    started: Instant,
    metadata: Metadata,
}

impl AnalyticsSession {
    /// Open a session with a fresh unique id.
    pub fn start() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            start_timestamp: Utc::now(),
            started: Instant::now(),
            metadata: Metadata::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn set_metadata(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    /// Close the session window at the current instant.
    pub fn close(self) -> SessionWindow {
        SessionWindow {
            session_id: self.session_id,
            start_timestamp: self.start_timestamp,
            end_timestamp: Utc::now(),
            total_duration_seconds: self.started.elapsed().as_secs_f64(),
            metadata: self.metadata,
        }
    }
}

/// Build the end-of-run report.
///
/// Pure: the same inputs always produce an identical report.
pub fn build_report(
    window: &SessionWindow,
    stages: &[StageRecord],
    usage: &UsageRecord,
    pricing: ModelPricing,
) -> SessionReport {
    SessionReport {
        session_id: window.session_id.clone(),
        start_timestamp: window.start_timestamp,
        end_timestamp: window.end_timestamp,
        total_duration_seconds: window.total_duration_seconds,
        metadata: window.metadata.clone(),
        usage: UsageReport {
            usage: usage.clone(),
            estimated_cost_usd: estimate_cost(usage, pricing),
        },
        execution: execution_report(stages),
        timeline: timeline(stages),
    }
}

fn execution_report(stages: &[StageRecord]) -> ExecutionReport {
    let total_duration: f64 = stages.iter().map(|s| s.duration_seconds).sum();
    let successful_stages = stages.iter().filter(|s| s.success).count();
    let average_duration = if stages.is_empty() {
        0.0
    } else {
        total_duration / stages.len() as f64
    };

    ExecutionReport {
        total_stages: stages.len(),
        successful_stages,
        failed_stages: stages.len() - successful_stages,
        total_duration,
        average_duration,
        stages: stages.to_vec(),
    }
}

fn timeline(stages: &[StageRecord]) -> Timeline {
    let steps: Vec<TimelineStep> = stages
        .iter()
        .enumerate()
        .map(|(i, stage)| TimelineStep {
            step: i + 1,
            stage_name: stage.stage_name.clone(),
            duration: stage.duration_seconds,
            status: stage.status,
            timestamp: stage.start_time,
        })
        .collect();

    let flow = steps
        .iter()
        .map(|step| step.stage_name.as_str())
        .collect::<Vec<_>>()
        .join(" → ");

    Timeline {
        total_steps: steps.len(),
        steps,
        flow,
    }
}
