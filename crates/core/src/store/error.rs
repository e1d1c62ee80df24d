//! Error types for the persistence layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode or decode stored JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to create database directory {path}: {source}")]
    CreateDir {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("invalid stored timestamp '{0}'")]
    Timestamp(String),
}
