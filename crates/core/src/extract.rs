//! Text extraction from uploaded documents.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("failed to read PDF: {0}")]
    Pdf(String),
    #[error("extraction task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, ExtractError>;
}

/// Extracts the text layer of a PDF. Scanned pages without text yield
/// nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, ExtractError> {
        // The parser is CPU bound and may panic on hostile input
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ExtractError::Task(e.to_string()))?
            .map_err(|e| ExtractError::Pdf(e.to_string()))
    }
}

/// Treats the upload as UTF-8 text, replacing invalid sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, ExtractError> {
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
