//! Initialization module for creating `.doc-insight` directory structures.
//!
//! Writes the built-in templates into a project so they can be edited:
//! - Global configuration (`config.toml`)
//! - Stage prompt templates (`prompts/*.md`)
//!
//! # Example
//!
//! ```no_run
//! use di_core::init::{InitOptions, generate_project_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! generate_project_structure(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_project_structure, InitOptions};
pub use templates::{get_template, list_templates};
