//! Custom assertion helpers for integration tests.

use di_protocol::analytics_models::{SessionReport, UsageRecord};
use di_protocol::events::Event;
use di_protocol::run_models::RunState;
use tokio::sync::mpsc;

/// Drain a channel whose senders have all been dropped.
#[allow(dead_code)]
pub async fn collect_events(mut rx: mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

/// Token totals equal the per-call sum and calls cover every detail.
#[allow(dead_code)]
pub fn assert_usage_invariants(usage: &UsageRecord) {
    let detail_total: u64 = usage.per_call_details.iter().map(|d| d.total_tokens).sum();
    assert_eq!(
        usage.total_tokens, detail_total,
        "total_tokens should equal the sum over call details"
    );
    assert!(
        usage.api_call_count >= usage.per_call_details.len() as u64,
        "api_calls ({}) should be at least the number of call details ({})",
        usage.api_call_count,
        usage.per_call_details.len()
    );
}

/// Four finalized records, in pipeline order, that do not overlap.
#[allow(dead_code)]
pub fn assert_complete_timeline(report: &SessionReport) {
    let names: Vec<&str> = report
        .execution
        .stages
        .iter()
        .map(|s| s.stage_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["classifier", "extractor", "summarizer", "insight_generator"]
    );

    for pair in report.execution.stages.windows(2) {
        let end = pair[0].end_time.expect("records are finalized");
        assert!(end <= pair[1].start_time, "stage records should not overlap");
    }
    assert!(report
        .execution
        .stages
        .iter()
        .all(|s| s.duration_seconds >= 0.0));
}

/// Seed line first, then at least one line per stage.
#[allow(dead_code)]
pub fn assert_log_trace(state: &RunState) {
    assert!(
        state.logs.len() >= 5,
        "expected seed line plus one line per stage, got {:?}",
        state.logs
    );
    assert!(state.logs[0].starts_with("system: received"));
    for (line, prefix) in state.logs[1..]
        .iter()
        .zip(["classifier:", "extractor:", "summarizer:", "insight_generator:"])
    {
        assert!(
            line.starts_with(prefix),
            "expected '{line}' to start with '{prefix}'"
        );
    }
}
