//! License compliance engine and the dashboard service built on it.
//!
//! The engine stages (classifier, metrics, distribution, forecast) are pure
//! functions of an owner's assignment snapshot and an explicit reference
//! date. The service pulls snapshots from a [`ComplianceSource`] and the date
//! from a [`Clock`]; the router exposes the reports over HTTP.

pub mod classifier;
pub mod distribution;
pub mod domain;
pub mod forecast;
pub mod import;
pub mod metrics;
pub mod router;
pub mod service;
pub mod source;
pub mod views;

#[cfg(test)]
mod tests;

pub use classifier::{
    classify, parse_calendar_date, MalformedDate, StatusPartition, TemporalClassifier,
    DEFAULT_SOON_WINDOW_DAYS,
};
pub use distribution::{distribution, group_by_license_type, DistributionFilter};
pub use domain::{
    AssignmentId, EmployeeId, Evaluated, ExpirationStatus, LicenseAssignment, LicenseTypeId,
    OwnerId, SkippedAssignment,
};
pub use forecast::{forecast_by_month, DEFAULT_FORECAST_MONTHS};
pub use import::{AssignmentImportError, AssignmentImporter};
pub use metrics::{aggregate, compliance_rate, guarded_ratio};
pub use router::{dashboard_router, OWNER_HEADER};
pub use service::{ComplianceDashboardService, DashboardError};
pub use source::{Clock, ComplianceSource, FixedClock, SourceError};
pub use views::{LicenseDistributionPoint, Metrics, MonthlyForecastBucket};
