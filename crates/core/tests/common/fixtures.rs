//! Test fixtures for building engines, services and stores.

use di_core::config::prompts::PromptSet;
use di_core::engine::PipelineEngine;
use di_core::extract::PlainTextExtractor;
use di_core::llm::mock::MockGenerator;
use di_core::service::AnalysisService;
use di_core::store::{AnalysisStore, SqliteStore};
use di_protocol::config_models::{PricingConfig, StageLimits};
use std::sync::Arc;
use tempfile::TempDir;

/// A short services agreement used as document text.
#[allow(dead_code)]
pub const SAMPLE_CONTRACT: &str = "SERVICES AGREEMENT\n\
This agreement is made between Acme Corp (the Client) and Globex Ltd (the Provider).\n\
1. Term. The agreement runs for twelve months from the date of signature.\n\
2. Fees. The Client pays 4,000 EUR per month within 30 days of invoice.\n\
3. Deliverables. The Provider delivers monthly status reports.";

/// Create a pipeline engine with the built-in prompts and default limits.
#[allow(dead_code)]
pub fn create_test_engine(generator: MockGenerator) -> PipelineEngine {
    create_test_engine_shared(Arc::new(generator))
}

/// Like [`create_test_engine`], keeping a handle on the generator.
#[allow(dead_code)]
pub fn create_test_engine_shared(generator: Arc<MockGenerator>) -> PipelineEngine {
    PipelineEngine::new(
        generator,
        PromptSet::embedded().expect("built-in prompts should parse"),
        StageLimits::default(),
    )
}

/// Create a service over plain-text uploads and the given store.
#[allow(dead_code)]
pub fn create_test_service(
    generator: MockGenerator,
    store: Arc<dyn AnalysisStore>,
) -> AnalysisService {
    AnalysisService::new(
        create_test_engine(generator),
        Arc::new(PlainTextExtractor),
        store,
        PricingConfig::default(),
    )
}

/// Open a SQLite store in a fresh temporary directory.
///
/// Returns the TempDir, which must be kept alive for the test duration.
#[allow(dead_code)]
pub async fn create_temp_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = SqliteStore::open(&dir.path().join("data/analysis.db"))
        .await
        .expect("Failed to open store");
    (dir, store)
}

/// A store whose connections are closed, so every call fails.
#[allow(dead_code)]
pub async fn create_closed_store() -> SqliteStore {
    let store = SqliteStore::in_memory()
        .await
        .expect("Failed to open in-memory store");
    store.close().await;
    store
}
