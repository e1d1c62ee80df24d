//! Per-stage timing and outcome bookkeeping.

use chrono::Utc;
use di_protocol::analytics_models::{Metadata, StageRecord, StageStatus};
use serde::Serialize;
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// `start_stage` was called while another stage was still open.
    #[error("stage '{0}' is still in flight")]
    StageInFlight(String),

    /// `end_stage` was called with no open stage.
    #[error("no stage is in flight")]
    NoStageInFlight,
}

#[derive(Debug)]
struct InFlight {
    record: StageRecord,
    started: Instant,
}

/// Records start, end and outcome of each stage invocation.
///
/// At most one stage is open at a time. Finalized records are appended to
/// the history in start order and never modified afterwards.
#[derive(Debug, Default)]
pub struct ExecutionTracker {
    in_flight: Option<InFlight>,
    history: Vec<StageRecord>,
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a record for `name`.
    ///
    /// Fails with [`TrackerError::StageInFlight`] if a stage is already open;
    /// the open record is left untouched.
    pub fn start_stage<T>(&mut self, name: &str, input: &T, metadata: Metadata) -> Result<(), TrackerError>
    where
        T: Serialize + ?Sized,
    {
        if let Some(open) = &self.in_flight {
            return Err(TrackerError::StageInFlight(open.record.stage_name.clone()));
        }

        tracing::info!(stage = name, "stage started");

        self.in_flight = Some(InFlight {
            record: StageRecord {
                stage_name: name.to_string(),
                start_time: Utc::now(),
                end_time: None,
                duration_seconds: 0.0,
                input_size: snapshot_size(input),
                output_size: 0,
                status: StageStatus::Running,
                success: false,
                error: None,
                metadata,
            },
            started: Instant::now(),
        });
        Ok(())
    }

    /// Finalize the open record and append it to the history.
    ///
    /// `metadata` is merged over the metadata given at start.
    pub fn end_stage<T>(
        &mut self,
        output: &T,
        success: bool,
        error: Option<String>,
        metadata: Metadata,
    ) -> Result<&StageRecord, TrackerError>
    where
        T: Serialize + ?Sized,
    {
        let InFlight {
            mut record,
            started,
        } = self.in_flight.take().ok_or(TrackerError::NoStageInFlight)?;

        record.end_time = Some(Utc::now());
        record.duration_seconds = started.elapsed().as_secs_f64();
        record.output_size = snapshot_size(output);
        record.success = success;
        record.status = if success {
            StageStatus::Completed
        } else {
            StageStatus::Failed
        };
        record.error = error;
        record.metadata.extend(metadata);

        if success {
            tracing::info!(
                stage = %record.stage_name,
                duration = record.duration_seconds,
                "stage completed"
            );
        } else {
            tracing::warn!(
                stage = %record.stage_name,
                duration = record.duration_seconds,
                error = record.error.as_deref().unwrap_or_default(),
                "stage failed"
            );
        }

        self.history.push(record);
        Ok(&self.history[self.history.len() - 1])
    }

    /// The open record, if any.
    pub fn in_flight(&self) -> Option<&StageRecord> {
        self.in_flight.as_ref().map(|open| &open.record)
    }

    /// Finalized records in start order.
    pub fn history(&self) -> &[StageRecord] {
        &self.history
    }

    pub fn into_history(self) -> Vec<StageRecord> {
        self.history
    }

    /// Drop the open record and the history.
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.history.clear();
    }
}

/// Size proxy of a snapshot: the character count of its JSON form.
pub fn snapshot_size<T>(value: &T) -> u64
where
    T: Serialize + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(json) => json.chars().count() as u64,
        Err(e) => {
            tracing::debug!(error = %e, "snapshot is not serializable; recording size 0");
            0
        }
    }
}
