//! Analysis service: the single entry point callers use to analyze a
//! document.
//!
//! Wires text extraction, the pipeline engine, session aggregation and
//! persistence together. Only a document without text aborts a run;
//! persistence failures are logged and reported through
//! [`AnalysisOutcome::persisted`].

use crate::analytics::session::{build_report, AnalyticsSession};
use crate::config::error::ConfigError;
use crate::config::models::AppConfig;
use crate::engine::PipelineEngine;
use crate::extract::{PdfTextExtractor, TextExtractor};
use crate::llm::base::{Generator, LlmError};
use crate::llm::openrouter::OpenRouterGenerator;
use crate::store::{AnalysisStore, SqliteStore, StoreError};
use chrono::Utc;
use di_protocol::api_models::{AnalysisRecord, AnalysisResult, AnalyzeResponse};
use di_protocol::config_models::PricingConfig;
use di_protocol::events::Event;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::Sender;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Nothing to analyze; the run never starts.
    #[error("Could not extract text from the document. It might be empty or contain only scanned images.")]
    NoText,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generator(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of one analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub response: AnalyzeResponse,

    /// Whether the result and report reached the store.
    pub persisted: bool,
}

pub struct AnalysisService {
    engine: PipelineEngine,
    extractor: Arc<dyn TextExtractor>,
    store: Arc<dyn AnalysisStore>,
    pricing: PricingConfig,
}

impl AnalysisService {
    pub fn new(
        engine: PipelineEngine,
        extractor: Arc<dyn TextExtractor>,
        store: Arc<dyn AnalysisStore>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            engine,
            extractor,
            store,
            pricing,
        }
    }

    /// Build the production service: OpenRouter generation, PDF extraction
    /// and the SQLite store at the configured path.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AnalysisError> {
        let generator: Arc<dyn Generator> =
            Arc::new(OpenRouterGenerator::from_config(&config.global.llm)?);
        if config.global.llm.api_key.is_none() {
            tracing::warn!(
                env = %config.global.llm.api_key_env,
                "no API key configured; every stage will fall back to its default"
            );
        }

        let engine = PipelineEngine::new(
            generator,
            config.prompts.clone(),
            config.global.limits,
        );
        let store = SqliteStore::open(&config.database_path()).await?;

        Ok(Self::new(
            engine,
            Arc::new(PdfTextExtractor),
            Arc::new(store),
            config.global.pricing.clone(),
        ))
    }

    /// Replace the text extractor, e.g. for plain-text input.
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn store(&self) -> &dyn AnalysisStore {
        self.store.as_ref()
    }

    /// Analyze one document.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::NoText`] when extraction fails or yields only
    /// whitespace. No stage runs and nothing is stored in that case.
    pub async fn analyze(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        events_tx: &Sender<Event>,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let raw_text = match self.extractor.extract(bytes).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(filename, error = %e, "text extraction failed");
                return Err(AnalysisError::NoText);
            }
        };
        if raw_text.trim().is_empty() {
            tracing::warn!(filename, "document contains no text");
            return Err(AnalysisError::NoText);
        }

        let model = self.engine.generator().model().to_string();
        let mut session = AnalyticsSession::start();
        session.set_metadata("filename", filename);
        session.set_metadata("text_length", raw_text.chars().count());
        session.set_metadata("model", model.as_str());
        let session_id = session.session_id().to_string();

        let outcome = self
            .engine
            .run(raw_text, filename, &session_id, events_tx)
            .await;

        let window = session.close();
        let report = build_report(
            &window,
            outcome.execution.history(),
            outcome.usage.record(),
            self.pricing.for_model(&model),
        );
        let result = AnalysisResult::from_run(&outcome.state);

        let record = AnalysisRecord {
            session_id: session_id.clone(),
            filename: filename.to_string(),
            uploaded_at: Utc::now(),
            result: result.clone(),
        };
        let persisted = match self.store.save(&record, &report).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(%session_id, error = %e, "failed to persist analysis");
                false
            }
        };

        Ok(AnalysisOutcome {
            response: AnalyzeResponse {
                result,
                session_id,
                analytics: report,
            },
            persisted,
        })
    }
}
