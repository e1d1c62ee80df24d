//! SQLite-backed [`AnalysisStore`].

use super::{AnalysisStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use di_protocol::analytics_models::SessionReport;
use di_protocol::api_models::{AnalysisRecord, AnalyticsSummary, SessionListing};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{ConnectOptions, Row};
use std::path::Path;
use std::str::FromStr;

const SCHEMA: [&str; 2] = [
    "
    CREATE TABLE IF NOT EXISTS analysis_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id TEXT NOT NULL,
        filename TEXT NOT NULL,
        upload_time TEXT NOT NULL,
        document_type TEXT NOT NULL,
        summary TEXT NOT NULL,
        key_sections TEXT NOT NULL,
        insights TEXT NOT NULL,
        agent_trace TEXT NOT NULL
    )
    ",
    "
    CREATE TABLE IF NOT EXISTS analytics_sessions (
        session_id TEXT PRIMARY KEY,
        filename TEXT NOT NULL,
        start_timestamp TEXT NOT NULL,
        end_timestamp TEXT NOT NULL,
        total_duration_seconds REAL NOT NULL,
        prompt_tokens INTEGER NOT NULL,
        completion_tokens INTEGER NOT NULL,
        total_tokens INTEGER NOT NULL,
        api_calls INTEGER NOT NULL,
        estimated_cost_usd REAL NOT NULL,
        successful_agents INTEGER NOT NULL,
        failed_agents INTEGER NOT NULL,
        report TEXT NOT NULL
    )
    ",
];

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database file at `path`.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        tracing::debug!(path = %path.display(), "opened analysis store");
        Self::with_pool(pool).await
    }

    /// A private in-memory database, gone when the store is dropped.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.disable_statement_logging();

        // Every connection to :memory: is its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Close every connection. Later calls fail with a database error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }
}

#[async_trait]
impl AnalysisStore for SqliteStore {
    async fn save(&self, record: &AnalysisRecord, report: &SessionReport) -> Result<(), StoreError> {
        let result = &record.result;
        let usage = &report.usage.usage;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "
            INSERT INTO analysis_results
                (session_id, filename, upload_time, document_type, summary,
                 key_sections, insights, agent_trace)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.session_id)
        .bind(&record.filename)
        .bind(format_timestamp(record.uploaded_at))
        .bind(&result.document_type)
        .bind(&result.summary)
        .bind(serde_json::to_string(&result.key_sections)?)
        .bind(serde_json::to_string(&result.insights)?)
        .bind(serde_json::to_string(&result.agent_trace)?)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "
            INSERT INTO analytics_sessions
                (session_id, filename, start_timestamp, end_timestamp,
                 total_duration_seconds, prompt_tokens, completion_tokens,
                 total_tokens, api_calls, estimated_cost_usd,
                 successful_agents, failed_agents, report)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&report.session_id)
        .bind(&record.filename)
        .bind(format_timestamp(report.start_timestamp))
        .bind(format_timestamp(report.end_timestamp))
        .bind(report.total_duration_seconds)
        .bind(to_sql_int(usage.prompt_tokens))
        .bind(to_sql_int(usage.completion_tokens))
        .bind(to_sql_int(usage.total_tokens))
        .bind(to_sql_int(usage.api_call_count))
        .bind(report.usage.estimated_cost_usd)
        .bind(to_sql_int(report.execution.successful_stages as u64))
        .bind(to_sql_int(report.execution.failed_stages as u64))
        .bind(serde_json::to_string(report)?)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(session_id = %report.session_id, "saved analysis");
        Ok(())
    }

    async fn recent_sessions(&self, limit: u32) -> Result<Vec<SessionListing>, StoreError> {
        let rows = sqlx::query(
            "
            SELECT s.session_id, s.filename, s.start_timestamp,
                   s.total_duration_seconds, s.total_tokens, s.api_calls,
                   s.estimated_cost_usd, s.successful_agents, s.failed_agents,
                   (SELECT r.document_type FROM analysis_results r
                     WHERE r.session_id = s.session_id LIMIT 1) AS document_type
            FROM analytics_sessions s
            ORDER BY s.start_timestamp DESC
            LIMIT ?
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<SessionListing, StoreError> {
                Ok(SessionListing {
                    session_id: row.try_get("session_id")?,
                    filename: row.try_get("filename")?,
                    document_type: row.try_get("document_type")?,
                    start_timestamp: parse_timestamp(&row.try_get::<String, _>("start_timestamp")?)?,
                    total_duration_seconds: row.try_get("total_duration_seconds")?,
                    total_tokens: from_sql_int(row.try_get("total_tokens")?),
                    api_calls: from_sql_int(row.try_get("api_calls")?),
                    estimated_cost_usd: row.try_get("estimated_cost_usd")?,
                    successful_stages: from_sql_int(row.try_get("successful_agents")?),
                    failed_stages: from_sql_int(row.try_get("failed_agents")?),
                })
            })
            .collect()
    }

    async fn session_report(&self, session_id: &str) -> Result<Option<SessionReport>, StoreError> {
        let row = sqlx::query("SELECT report FROM analytics_sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let report: String = row.try_get("report")?;
                Ok(Some(serde_json::from_str(&report)?))
            }
            None => Ok(None),
        }
    }

    async fn summary(&self) -> Result<AnalyticsSummary, StoreError> {
        let row = sqlx::query(
            "
            SELECT COUNT(*) AS total_sessions,
                   CAST(COALESCE(SUM(total_tokens), 0) AS INTEGER) AS total_tokens,
                   CAST(COALESCE(SUM(estimated_cost_usd), 0.0) AS REAL) AS total_cost_usd,
                   CAST(COALESCE(AVG(total_duration_seconds), 0.0) AS REAL) AS average_duration_seconds
            FROM analytics_sessions
            ",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(AnalyticsSummary {
            total_sessions: from_sql_int(row.try_get("total_sessions")?),
            total_tokens: from_sql_int(row.try_get("total_tokens")?),
            total_cost_usd: row.try_get("total_cost_usd")?,
            average_duration_seconds: row.try_get("average_duration_seconds")?,
        })
    }
}

/// Fixed-width RFC 3339 so that text order is chronological order.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StoreError::Timestamp(raw.to_string()))
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
