//! Configuration loading and management.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.doc-insight/` directory structure, plus the built-in prompt
//! templates.

pub mod error;
pub mod loader;
pub mod models;
pub mod prompts;
