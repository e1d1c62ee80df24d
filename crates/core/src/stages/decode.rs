//! Typed decoders for the structured stage responses.
//!
//! Each decoder accepts the raw completion text, unwraps a Markdown code
//! fence if present, and reads one expected key. A missing (or `null`) key
//! yields the documented default; a key of the wrong type is an error.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_DOCUMENT_TYPE: &str = "Unknown";
pub const DEFAULT_SUMMARY: &str = "No summary generated.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("field '{field}' should be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierOutput {
    pub document_type: String,
}

impl Default for ClassifierOutput {
    fn default() -> Self {
        Self {
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractorOutput {
    pub sections: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOutput {
    pub summary: String,
}

impl Default for SummaryOutput {
    fn default() -> Self {
        Self {
            summary: DEFAULT_SUMMARY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InsightsOutput {
    pub insights: Vec<String>,
}

pub fn decode_classifier(raw: &str) -> Result<ClassifierOutput, DecodeError> {
    let object = parse_object(raw)?;
    match field(&object, "document_type") {
        None => Ok(ClassifierOutput::default()),
        Some(Value::String(document_type)) => Ok(ClassifierOutput {
            document_type: document_type.clone(),
        }),
        Some(_) => Err(DecodeError::WrongType {
            field: "document_type",
            expected: "a string",
        }),
    }
}

pub fn decode_extractor(raw: &str) -> Result<ExtractorOutput, DecodeError> {
    let object = parse_object(raw)?;
    match field(&object, "sections") {
        None => Ok(ExtractorOutput::default()),
        Some(Value::Object(sections)) => Ok(ExtractorOutput {
            sections: sections
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }),
        Some(_) => Err(DecodeError::WrongType {
            field: "sections",
            expected: "an object",
        }),
    }
}

pub fn decode_summary(raw: &str) -> Result<SummaryOutput, DecodeError> {
    let object = parse_object(raw)?;
    match field(&object, "summary") {
        None => Ok(SummaryOutput::default()),
        Some(Value::String(summary)) => Ok(SummaryOutput {
            summary: summary.clone(),
        }),
        Some(_) => Err(DecodeError::WrongType {
            field: "summary",
            expected: "a string",
        }),
    }
}

/// Non-string list items are kept as their JSON text.
pub fn decode_insights(raw: &str) -> Result<InsightsOutput, DecodeError> {
    let object = parse_object(raw)?;
    match field(&object, "insights") {
        None => Ok(InsightsOutput::default()),
        Some(Value::Array(items)) => Ok(InsightsOutput {
            insights: items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        }),
        Some(_) => Err(DecodeError::WrongType {
            field: "insights",
            expected: "a list",
        }),
    }
}

fn field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, DecodeError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(DecodeError::NotAnObject),
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest.trim_start_matches("json"),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}
