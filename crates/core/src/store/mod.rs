//! Durable storage of analysis results and their analytics sessions.

pub mod error;
pub mod sqlite;

pub use error::StoreError;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use di_protocol::analytics_models::SessionReport;
use di_protocol::api_models::{AnalysisRecord, AnalyticsSummary, SessionListing};

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Store one run's result and report together.
    async fn save(&self, record: &AnalysisRecord, report: &SessionReport) -> Result<(), StoreError>;

    /// Most recent sessions first.
    async fn recent_sessions(&self, limit: u32) -> Result<Vec<SessionListing>, StoreError>;

    async fn session_report(&self, session_id: &str) -> Result<Option<SessionReport>, StoreError>;

    /// Totals over every stored session; all zero when empty.
    async fn summary(&self) -> Result<AnalyticsSummary, StoreError>;
}
