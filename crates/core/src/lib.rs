//! # di-core
//!
//! Document analysis pipeline and run tracking for doc-insight.
//!
//! This crate provides:
//! - Configuration loading from the `.doc-insight/` directory
//! - Generation backends behind the [`llm::Generator`] trait
//! - The four stage executors and the pipeline engine that drives them
//! - Execution and token-usage tracking with end-of-run session reports
//! - Text extraction, SQLite persistence and the analysis service
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and prompt templates
//! - [`llm`]: Generator trait and backends
//! - [`stages`]: Stage executors and response decoders
//! - [`engine`]: Pipeline execution engine
//! - [`state`]: Run lifecycle and progress events
//! - [`analytics`]: Execution/usage trackers and the session aggregator
//! - [`extract`]: Text extraction from uploads
//! - [`store`]: Result and session persistence
//! - [`service`]: End-to-end analysis entry point
//! - [`init`]: `.doc-insight/` scaffolding

pub mod analytics;
pub mod config;
pub mod engine;
pub mod extract;
pub mod init;
pub mod llm;
pub mod service;
pub mod stages;
pub mod state;
pub mod store;
