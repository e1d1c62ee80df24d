//! Request handlers.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use di_protocol::analytics_models::SessionReport;
use di_protocol::api_models::{AnalyticsSummary, AnalyzeResponse, SessionList};
use di_protocol::events::Event;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "file";

pub const DEFAULT_SESSION_LIMIT: u32 = 20;
pub const MAX_SESSION_LIMIT: u32 = 100;

const EVENT_BUFFER: usize = 64;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /analyze-pdf`
pub async fn analyze_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let (filename, bytes) = read_upload(&mut multipart).await?;
    tracing::info!(%filename, bytes = bytes.len(), "received upload");

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let forwarder = tokio::spawn(forward_events(rx));

    let result = state.service.analyze(bytes, &filename, &tx).await;
    drop(tx);
    let _ = forwarder.await;

    let outcome = result?;
    if !outcome.persisted {
        tracing::warn!(
            session_id = %outcome.response.session_id,
            "returning analysis that was not persisted"
        );
    }
    Ok(Json(outcome.response))
}

/// Pull the `file` field out of the form. Other fields are ignored.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or("upload.pdf")
            .to_string();
        let bytes = field.bytes().await?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(ApiError::BadRequest(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// Drain run events into the log so the channel never blocks the run.
async fn forward_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match event {
            Event::RunLogChunk {
                session_id,
                content,
            } => tracing::info!(%session_id, "{content}"),
            other => tracing::debug!(session_id = %other.session_id(), event = ?other, "run event"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
    pub limit: Option<u32>,
}

/// `GET /analytics/sessions`
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionsQuery>,
) -> Result<Json<SessionList>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SESSION_LIMIT)
        .clamp(1, MAX_SESSION_LIMIT);
    let sessions = state.service.store().recent_sessions(limit).await?;
    Ok(Json(SessionList { sessions }))
}

/// `GET /analytics/sessions/{session_id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionReport>, ApiError> {
    state
        .service
        .store()
        .session_report(&session_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Session {session_id} not found")))
}

/// `GET /analytics/summary`
pub async fn summary(State(state): State<AppState>) -> Result<Json<AnalyticsSummary>, ApiError> {
    Ok(Json(state.service.store().summary().await?))
}
