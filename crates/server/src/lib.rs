//! # di-server
//!
//! HTTP API for doc-insight.
//!
//! Exposes the analysis service over axum:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /analyze-pdf` | Analyze an uploaded document (multipart field `file`) |
//! | `GET /analytics/sessions` | Recent sessions, `?limit=` (default 20, max 100) |
//! | `GET /analytics/sessions/{session_id}` | One stored session report |
//! | `GET /analytics/summary` | Totals over all sessions |
//! | `GET /health` | Liveness |

pub mod error;
pub mod routes;

pub use error::ApiError;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use di_core::service::AnalysisService;
use di_protocol::config_models::ServerConfig;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
}

impl AppState {
    pub fn new(service: AnalysisService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/analyze-pdf", post(routes::analyze_pdf))
        .route("/analytics/sessions", get(routes::list_sessions))
        .route("/analytics/sessions/{session_id}", get(routes::get_session))
        .route("/analytics/summary", get(routes::summary))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API until Ctrl-C.
pub async fn serve(service: AnalysisService, config: &ServerConfig) -> anyhow::Result<()> {
    let app = router(AppState::new(service), config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let addr = listener
        .local_addr()
        .context("failed to read listener address")?;

    tracing::info!(%addr, "doc-insight API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
