use std::path::PathBuf;
use thiserror::Error;

pub type InitResult<T> = Result<T, InitError>;

/// Failures while scaffolding `.doc-insight/`.
#[derive(Debug, Error)]
pub enum InitError {
    /// Scaffolding would overwrite an existing project configuration.
    #[error("{} already exists; use --force to overwrite", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("built-in template '{0}' is missing from the binary")]
    MissingTemplate(String),

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
