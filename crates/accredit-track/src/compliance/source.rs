use super::domain::{LicenseAssignment, OwnerId};
use chrono::NaiveDate;

/// Owner-scoped read access to the store, so the engine never builds queries.
pub trait ComplianceSource: Send + Sync {
    /// Non-deleted assignments belonging to `owner`.
    fn fetch_assignments(&self, owner: &OwnerId) -> Result<Vec<LicenseAssignment>, SourceError>;
    fn fetch_total_employees(&self, owner: &OwnerId) -> Result<usize, SourceError>;
    fn fetch_notification_count(&self, owner: &OwnerId) -> Result<usize, SourceError>;
}

/// Error enumeration for upstream fetch failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("data not found")]
    NotFound,
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the reference date; the engine never reads the wall clock itself.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
