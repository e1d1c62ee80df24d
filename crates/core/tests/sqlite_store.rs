//! Integration tests for the SQLite analysis store.

mod common;

use chrono::{Duration, Utc};
use common::*;
use di_core::analytics::{build_report, SessionWindow};
use di_core::store::{AnalysisStore, SqliteStore, StoreError};
use di_protocol::analytics_models::{
    Metadata, SessionReport, StageRecord, StageStatus, UsageRecord,
};
use di_protocol::api_models::{AnalysisRecord, AnalysisResult};
use di_protocol::config_models::ModelPricing;
use serde_json::json;
use std::collections::BTreeMap;

fn sample_report(session_id: &str, minutes_ago: i64, tokens: u64, duration: f64) -> SessionReport {
    let start = Utc::now() - Duration::minutes(minutes_ago);
    let window = SessionWindow {
        session_id: session_id.to_string(),
        start_timestamp: start,
        end_timestamp: start + Duration::milliseconds((duration * 1000.0) as i64),
        total_duration_seconds: duration,
        metadata: Metadata::from([("filename".to_string(), json!("doc.pdf"))]),
    };
    let stages = vec![StageRecord {
        stage_name: "classifier".to_string(),
        start_time: start,
        end_time: Some(start),
        duration_seconds: 0.0,
        input_size: 12,
        output_size: 30,
        status: StageStatus::Completed,
        success: true,
        error: None,
        metadata: Metadata::new(),
    }];
    let usage = UsageRecord {
        prompt_tokens: tokens,
        completion_tokens: 0,
        total_tokens: tokens,
        api_call_count: 1,
        per_call_details: Vec::new(),
    };
    build_report(&window, &stages, &usage, ModelPricing::default())
}

fn sample_record(session_id: &str, document_type: &str) -> AnalysisRecord {
    AnalysisRecord {
        session_id: session_id.to_string(),
        filename: "doc.pdf".to_string(),
        uploaded_at: Utc::now(),
        result: AnalysisResult {
            document_type: document_type.to_string(),
            summary: "A summary.".to_string(),
            key_sections: BTreeMap::from([("Term".to_string(), json!("1 year"))]),
            insights: vec!["Risk: none".to_string()],
            agent_trace: vec!["system: received doc.pdf, 10 chars of text".to_string()],
        },
    }
}

#[tokio::test]
async fn test_save_and_read_back_report() {
    let (_dir, store) = create_temp_store().await;
    let report = sample_report("s-1", 0, 600, 2.5);

    store
        .save(&sample_record("s-1", "Contract"), &report)
        .await
        .expect("save should succeed");

    let loaded = store
        .session_report("s-1")
        .await
        .unwrap()
        .expect("report should exist");
    assert_eq!(loaded, report);
    assert!(store.session_report("s-2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_report_durations_read_back_exactly() {
    let (_dir, store) = create_temp_store().await;
    // Needs all 17 significant digits to survive the JSON column
    let duration = 0.009906820319342497;
    let report = sample_report("precise", 0, 42, duration);

    store
        .save(&sample_record("precise", "Invoice"), &report)
        .await
        .unwrap();

    let loaded = store.session_report("precise").await.unwrap().unwrap();
    assert_eq!(loaded.total_duration_seconds.to_bits(), duration.to_bits());
    assert_eq!(loaded, report);
}

#[tokio::test]
async fn test_recent_sessions_carry_stage_counts() {
    let (_dir, store) = create_temp_store().await;
    let mut report = sample_report("partial", 0, 100, 1.0);
    report.execution.successful_stages = 3;
    report.execution.failed_stages = 1;
    store
        .save(&sample_record("partial", "Contract"), &report)
        .await
        .unwrap();

    let sessions = store.recent_sessions(10).await.unwrap();
    assert_eq!(sessions[0].successful_stages, 3);
    assert_eq!(sessions[0].failed_stages, 1);

    let listing = serde_json::to_value(&sessions[0]).unwrap();
    assert_eq!(listing["successful_agents"], 3);
    assert_eq!(listing["failed_agents"], 1);
}

#[tokio::test]
async fn test_recent_sessions_newest_first_with_limit() {
    let (_dir, store) = create_temp_store().await;
    for (id, minutes_ago, doc_type) in [("old", 30, "Notes"), ("new", 1, "Invoice"), ("mid", 10, "Resume")] {
        store
            .save(&sample_record(id, doc_type), &sample_report(id, minutes_ago, 100, 1.0))
            .await
            .unwrap();
    }

    let sessions = store.recent_sessions(2).await.unwrap();
    let ids: Vec<&str> = sessions.iter().map(|s| s.session_id.as_str()).collect();
    assert_eq!(ids, vec!["new", "mid"]);
    assert_eq!(sessions[0].document_type.as_deref(), Some("Invoice"));
    assert_eq!(sessions[0].filename, "doc.pdf");
    assert_eq!(sessions[0].total_tokens, 100);
    assert_eq!(sessions[0].api_calls, 1);
}

#[tokio::test]
async fn test_summary_aggregates_all_sessions() {
    let (_dir, store) = create_temp_store().await;
    assert_eq!(store.summary().await.unwrap().total_sessions, 0);

    let first = sample_report("a", 5, 600, 2.0);
    let second = sample_report("b", 1, 400, 4.0);
    store.save(&sample_record("a", "Contract"), &first).await.unwrap();
    store.save(&sample_record("b", "Notes"), &second).await.unwrap();

    let summary = store.summary().await.unwrap();
    assert_eq!(summary.total_sessions, 2);
    assert_eq!(summary.total_tokens, 1000);
    assert!((summary.average_duration_seconds - 3.0).abs() < 1e-9);
    let expected_cost = first.usage.estimated_cost_usd + second.usage.estimated_cost_usd;
    assert!((summary.total_cost_usd - expected_cost).abs() < 1e-12);

    let wire = serde_json::to_value(&summary).unwrap();
    assert_eq!(wire["total_cost"], json!(summary.total_cost_usd));
    assert_eq!(wire["average_duration"], json!(summary.average_duration_seconds));
}

#[tokio::test]
async fn test_duplicate_session_is_rejected_atomically() {
    let (_dir, store) = create_temp_store().await;
    let report = sample_report("dup", 0, 10, 1.0);
    store.save(&sample_record("dup", "Contract"), &report).await.unwrap();

    let second = store.save(&sample_record("dup", "Notes"), &report).await;
    assert!(matches!(second, Err(StoreError::Database(_))));

    // The result row of the failed save was rolled back with it
    let sessions = store.recent_sessions(10).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].document_type.as_deref(), Some("Contract"));
}

#[tokio::test]
async fn test_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.db");
    {
        let store = SqliteStore::open(&path).await.unwrap();
        store
            .save(&sample_record("kept", "Contract"), &sample_report("kept", 0, 1, 1.0))
            .await
            .unwrap();
        store.close().await;
    }

    let reopened = SqliteStore::open(&path).await.unwrap();
    assert!(reopened.session_report("kept").await.unwrap().is_some());
}

#[tokio::test]
async fn test_closed_store_fails() {
    let store = create_closed_store().await;
    let result = store
        .save(&sample_record("x", "Contract"), &sample_report("x", 0, 1, 1.0))
        .await;
    assert!(matches!(result, Err(StoreError::Database(_))));
}
