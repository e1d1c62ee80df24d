//! Generation backends.
//!
//! The pipeline depends only on the [`Generator`] trait: a rendered prompt in,
//! raw completion text plus optional usage metadata out. Concrete backends:
//!
//! - [`OpenRouterGenerator`]: OpenAI-compatible chat completions over HTTP
//! - [`MockGenerator`]: scripted responses for tests and offline runs

pub mod base;
pub mod mock;
pub mod openrouter;

pub use base::{observe_generation, CallObserver, Generation, Generator, LlmError};
pub use mock::MockGenerator;
pub use openrouter::OpenRouterGenerator;
