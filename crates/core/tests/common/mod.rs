//! Common test utilities shared by the integration suites.
//!
//! - Fixtures: sample documents, engines, services and stores
//! - Mock generators for failure and usage scenarios
//! - Custom assertions over reports and event streams

pub mod assertions;
pub mod fixtures;
pub mod mock_generators;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_generators::*;
