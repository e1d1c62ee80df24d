//! Prompt template models for `.doc-insight/prompts/*.md`.
//!
//! Templates are Markdown files with YAML front matter naming the stage they
//! belong to. The file body is the template text.

use crate::run_models::StageKind;
use serde::{Deserialize, Serialize};

/// A stage's prompt template.
///
/// # Example
///
/// ```markdown
/// ---
/// stage: classifier
/// description: Classifies the document type from its opening text
/// ---
///
/// Classify the following text sample.
///
/// Text Sample:
/// {text}
///
/// Return ONLY a JSON object with the key "document_type".
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// The stage that renders this template.
    pub stage: StageKind,

    /// Human-readable note about the template.
    #[serde(default)]
    pub description: String,

    /// The template text from the Markdown body.
    ///
    /// Not part of the front matter, so it is skipped during serialization.
    #[serde(skip)]
    pub template: String,
}
