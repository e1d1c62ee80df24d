//! Router tests driven through `tower::ServiceExt::oneshot`.
//!
//! Uploads are plain text so no PDF fixtures are needed; the store is an
//! in-memory SQLite database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use di_core::config::prompts::PromptSet;
use di_core::engine::PipelineEngine;
use di_core::extract::PlainTextExtractor;
use di_core::llm::base::LlmError;
use di_core::llm::mock::MockGenerator;
use di_core::service::AnalysisService;
use di_core::store::SqliteStore;
use di_protocol::config_models::{PricingConfig, StageLimits};
use di_server::{router, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "doc-insight-test-boundary";
const MAX_UPLOAD: usize = 64 * 1024;

/// Stage responses for `runs` consecutive analyses of a contract.
fn contract_script(runs: usize) -> Vec<Result<String, LlmError>> {
    let one_run = [
        r#"{"document_type": "Contract"}"#,
        r#"{"sections": {"Parties": "Acme Corp and Globex Ltd"}}"#,
        r#"{"summary": "A services agreement between Acme Corp and Globex Ltd."}"#,
        r#"{"insights": ["Risk: No termination clause"]}"#,
    ];
    (0..runs)
        .flat_map(|_| one_run.iter().map(|r| Ok(r.to_string())))
        .collect()
}

async fn create_test_app() -> Router {
    create_test_app_with(MockGenerator::success()).await
}

async fn create_test_app_with(generator: MockGenerator) -> Router {
    let store = SqliteStore::in_memory()
        .await
        .expect("Failed to open in-memory store");
    let engine = PipelineEngine::new(
        Arc::new(generator),
        PromptSet::embedded().expect("built-in prompts should parse"),
        StageLimits::default(),
    );
    let service = AnalysisService::new(
        engine,
        Arc::new(PlainTextExtractor),
        Arc::new(store),
        PricingConfig::default(),
    );
    router(AppState::new(service), MAX_UPLOAD)
}

fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze-pdf")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

async fn upload(app: &Router, filename: &str, content: &[u8]) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(upload_request(multipart_body("file", filename, content)))
        .await
        .unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;
    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_analyze_upload_returns_result_and_analytics() {
    let app = create_test_app().await;
    let (status, body) =
        upload(&app, "contract.txt", b"SERVICES AGREEMENT between Acme and Globex").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document_type"], "Contract");
    assert!(body["summary"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(body["key_sections"].is_object());
    assert!(body["insights"].is_array());

    let trace = body["agent_trace"].as_array().unwrap();
    assert_eq!(trace.len(), 5);
    assert!(trace[0]
        .as_str()
        .unwrap()
        .contains("received contract.txt"));

    let session_id = body["session_id"].as_str().unwrap();
    assert_eq!(body["analytics"]["session_id"], session_id);
    assert_eq!(body["analytics"]["token_usage"]["api_calls"], 4);
    assert_eq!(
        body["analytics"]["agent_execution"]["executions"]
            .as_array()
            .unwrap()
            .len(),
        4
    );
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let app = create_test_app().await;
    let (status, body) = upload(&app, "empty.pdf", b"   \n").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Could not extract text"));

    // Nothing was stored
    let response = app.oneshot(get_request("/analytics/summary")).await.unwrap();
    assert_eq!(json_body(response).await["total_sessions"], 0);
}

#[tokio::test]
async fn test_missing_file_field_is_rejected() {
    let app = create_test_app().await;
    let response = app
        .oneshot(upload_request(multipart_body("document", "a.txt", b"text")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["detail"],
        "Missing multipart field 'file'"
    );
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let app = create_test_app().await;
    let content = vec![b'a'; MAX_UPLOAD * 2];
    let response = app
        .oneshot(upload_request(multipart_body("file", "big.txt", &content)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = create_test_app().await;
    let response = app
        .oneshot(get_request("/analytics/sessions/does-not-exist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await["detail"],
        "Session does-not-exist not found"
    );
}

#[tokio::test]
async fn test_stored_session_is_served() {
    let app = create_test_app().await;
    let (_, uploaded) = upload(&app, "contract.txt", b"SERVICES AGREEMENT").await;
    let session_id = uploaded["session_id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/analytics/sessions/{session_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, uploaded["analytics"]);
}

#[tokio::test]
async fn test_sessions_listing_and_summary() {
    let app = create_test_app_with(MockGenerator::new(contract_script(3))).await;
    for name in ["a.txt", "b.txt", "c.txt"] {
        let (status, _) = upload(&app, name, b"SERVICES AGREEMENT").await;
        assert_eq!(status, StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_request("/analytics/sessions?limit=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = json_body(response).await;
    let sessions = listing["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["filename"], "c.txt");
    assert_eq!(sessions[0]["successful_agents"], 4);
    assert_eq!(sessions[0]["failed_agents"], 0);

    // Out of range limits are clamped
    let response = app
        .clone()
        .oneshot(get_request("/analytics/sessions?limit=0"))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["sessions"].as_array().unwrap().len(), 1);

    let response = app.oneshot(get_request("/analytics/summary")).await.unwrap();
    let summary = json_body(response).await;
    assert_eq!(summary["total_sessions"], 3);
    assert_eq!(summary["total_tokens"], 1800);
    assert!(summary["total_cost"].as_f64().is_some_and(|cost| cost > 0.0));
    assert!(summary["average_duration"].is_number());
    assert!(summary.get("total_cost_usd").is_none());
}
