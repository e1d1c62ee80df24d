//! Run analytics: stage timing, token accounting and the end-of-run report.
//!
//! Each run owns one [`ExecutionTracker`] and one [`UsageTracker`]; nothing
//! here is shared between runs. [`build_report`] folds both into an immutable
//! [`SessionReport`](di_protocol::analytics_models::SessionReport).

pub mod execution;
pub mod pricing;
pub mod session;
pub mod usage;

pub use execution::{snapshot_size, ExecutionTracker, TrackerError};
pub use pricing::estimate_cost;
pub use session::{build_report, AnalyticsSession, SessionWindow};
pub use usage::UsageTracker;
