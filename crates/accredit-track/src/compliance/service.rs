use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::classifier::TemporalClassifier;
use super::distribution::{distribution, DistributionFilter};
use super::domain::{Evaluated, OwnerId, SkippedAssignment};
use super::forecast::forecast_by_month;
use super::metrics::aggregate;
use super::source::{Clock, ComplianceSource, SourceError};
use super::views::{LicenseDistributionPoint, Metrics, MonthlyForecastBucket};
use crate::config::ComplianceConfig;

/// Service composing the data source, the clock, and the compliance engine.
pub struct ComplianceDashboardService<S, C> {
    source: Arc<S>,
    clock: Arc<C>,
    classifier: TemporalClassifier,
    forecast_months: u32,
}

impl<S, C> ComplianceDashboardService<S, C>
where
    S: ComplianceSource + 'static,
    C: Clock + 'static,
{
    pub fn new(source: Arc<S>, clock: Arc<C>, config: ComplianceConfig) -> Self {
        Self {
            source,
            clock,
            classifier: TemporalClassifier::new(config.soon_window_days),
            forecast_months: config.forecast_months,
        }
    }

    /// Reference date used when a caller does not pin one.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn forecast_months(&self) -> u32 {
        self.forecast_months
    }

    pub fn soon_window_days(&self) -> u32 {
        self.classifier.soon_window_days()
    }

    /// Summary metrics. Employee and notification totals are fetched before
    /// the assignments are classified; any fetch failure aborts the report.
    pub fn metrics(
        &self,
        owner: &OwnerId,
        as_of: Option<NaiveDate>,
    ) -> Result<Evaluated<Metrics>, DashboardError> {
        let reference = as_of.unwrap_or_else(|| self.today());
        let total_employees = self.source.fetch_total_employees(owner)?;
        let notification_count = self.source.fetch_notification_count(owner)?;
        let assignments = self.source.fetch_assignments(owner)?;

        let report = aggregate(
            &assignments,
            total_employees,
            notification_count,
            reference,
            &self.classifier,
        );
        log_skipped("metrics", owner, &report.skipped);
        debug!(
            %owner,
            %reference,
            total = report.value.total_employee_licenses,
            expired = report.value.expired_count,
            expiring_soon = report.value.expiring_soon,
            soon_window_days = self.soon_window_days(),
            "computed compliance metrics"
        );
        Ok(report)
    }

    /// License counts per type for the chosen subset.
    pub fn license_distribution(
        &self,
        owner: &OwnerId,
        filter: DistributionFilter,
        as_of: Option<NaiveDate>,
    ) -> Result<Evaluated<Vec<LicenseDistributionPoint>>, DashboardError> {
        let reference = as_of.unwrap_or_else(|| self.today());
        let assignments = self.source.fetch_assignments(owner)?;

        let report = distribution(&assignments, reference, &self.classifier, filter);
        log_skipped("license distribution", owner, &report.skipped);
        debug!(%owner, %reference, ?filter, groups = report.value.len(), "computed license distribution");
        Ok(report)
    }

    /// Rolling month-by-month count of upcoming expirations.
    pub fn expiration_forecast(
        &self,
        owner: &OwnerId,
        as_of: Option<NaiveDate>,
    ) -> Result<Evaluated<Vec<MonthlyForecastBucket>>, DashboardError> {
        let reference = as_of.unwrap_or_else(|| self.today());
        let assignments = self.source.fetch_assignments(owner)?;

        let report = forecast_by_month(&assignments, reference, self.forecast_months);
        log_skipped("expiration forecast", owner, &report.skipped);
        debug!(%owner, %reference, months = self.forecast_months, "computed expiration forecast");
        Ok(report)
    }
}

fn log_skipped(report: &str, owner: &OwnerId, skipped: &[SkippedAssignment]) {
    for entry in skipped {
        warn!(
            %owner,
            assignment_id = %entry.assignment_id,
            raw_expiration = %entry.raw_expiration,
            "skipping assignment with malformed expiration date in {report}"
        );
    }
}

/// Error raised by the dashboard service.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Upstream(#[from] SourceError),
}
