//! Compliance reporting for employee license tracking.
//!
//! The [`compliance`] module holds the pure engine (classification, metrics,
//! distributions and forecasts) together with the service and router that
//! feed it owner-scoped snapshots.

pub mod compliance;
pub mod config;
pub mod error;
pub mod telemetry;
