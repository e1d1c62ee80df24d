//! # di-protocol
//!
//! Shared data models for doc-insight.
//!
//! This crate defines all data structures shared between the core pipeline,
//! the HTTP server and the CLI:
//! - Run state threaded through the analysis stages
//! - Stage records, usage counters and the end-of-run session report
//! - Configuration file models (`config.toml`, prompt templates)
//! - Progress events and API payloads
//!
//! ## Modules
//!
//! - [`run_models`]: Run state, phases and stage kinds
//! - [`analytics_models`]: Stage records, usage records, session reports
//! - [`config_models`]: Global configuration from config.toml
//! - [`prompt_models`]: Stage prompt templates
//! - [`events`]: Progress events emitted during a run
//! - [`api_models`]: Results, listings and summaries returned to callers
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, serde_json and chrono
//! - Independent compilation: no dependencies on other doc-insight crates

pub mod analytics_models;
pub mod api_models;
pub mod config_models;
pub mod events;
pub mod prompt_models;
pub mod run_models;

// Re-export all public types for convenience
pub use analytics_models::*;
pub use api_models::*;
pub use config_models::*;
pub use events::*;
pub use prompt_models::*;
pub use run_models::*;
