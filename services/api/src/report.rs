use crate::infra::{InMemoryComplianceSource, SystemClock};
use accredit_track::compliance::{
    AssignmentImporter, ComplianceDashboardService, DistributionFilter, Evaluated,
    LicenseDistributionPoint, Metrics, MonthlyForecastBucket, OwnerId, SkippedAssignment,
};
use accredit_track::config::ComplianceConfig;
use accredit_track::error::AppError;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Owner (subject id) whose licenses are reported
    #[arg(long)]
    pub(crate) owner: String,
    /// CSV export of license assignments
    #[arg(long)]
    pub(crate) assignments: PathBuf,
    /// Optional CSV roster of employees (id,ownerId)
    #[arg(long)]
    pub(crate) employees: Option<PathBuf>,
    /// Notification count to report alongside the metrics
    #[arg(long, default_value_t = 0)]
    pub(crate) notifications: usize,
    /// Reference date for the report (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Days ahead that count as expiring soon
    #[arg(long, default_value_t = accredit_track::compliance::DEFAULT_SOON_WINDOW_DAYS)]
    pub(crate) soon_window_days: u32,
    /// Number of months in the expiration forecast
    #[arg(
        long,
        default_value_t = accredit_track::compliance::DEFAULT_FORECAST_MONTHS,
        value_parser = clap::value_parser!(u32).range(1..=24)
    )]
    pub(crate) months: u32,
    /// Print the reports as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DashboardReport {
    pub(crate) owner: OwnerId,
    pub(crate) today: NaiveDate,
    pub(crate) metrics: Metrics,
    pub(crate) active_licenses: Vec<LicenseDistributionPoint>,
    pub(crate) expired_licenses: Vec<LicenseDistributionPoint>,
    pub(crate) expiring_by_month: Vec<MonthlyForecastBucket>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) skipped: Vec<SkippedAssignment>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        owner,
        assignments,
        employees,
        notifications,
        today,
        soon_window_days,
        months,
        json,
    } = args;

    let owner = OwnerId(owner);
    let assignments = AssignmentImporter::assignments_from_path(assignments)?;
    let roster = employees
        .map(AssignmentImporter::employee_counts_from_path)
        .transpose()?;

    let source = InMemoryComplianceSource::from_exports(assignments, roster);
    source.set_notification_count(owner.clone(), notifications)?;

    let service = ComplianceDashboardService::new(
        Arc::new(source),
        Arc::new(SystemClock),
        ComplianceConfig {
            soon_window_days,
            forecast_months: months,
        },
    );
    let today = today.unwrap_or_else(|| service.today());

    let report = build_report(&service, owner, today)?;
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Report payload unavailable: {err}"),
        }
    } else {
        render_report(&report);
    }

    Ok(())
}

fn build_report(
    service: &ComplianceDashboardService<InMemoryComplianceSource, SystemClock>,
    owner: OwnerId,
    today: NaiveDate,
) -> Result<DashboardReport, AppError> {
    let metrics = service.metrics(&owner, Some(today))?;
    let active = service.license_distribution(&owner, DistributionFilter::Active, Some(today))?;
    let expired =
        service.license_distribution(&owner, DistributionFilter::Expired, Some(today))?;
    let forecast = service.expiration_forecast(&owner, Some(today))?;

    // All reports share one snapshot; list malformed rows once.
    let Evaluated {
        value: metrics,
        skipped,
    } = metrics;

    Ok(DashboardReport {
        owner,
        today,
        metrics,
        active_licenses: active.value,
        expired_licenses: expired.value,
        expiring_by_month: forecast.value,
        skipped,
    })
}

pub(crate) fn render_report(report: &DashboardReport) {
    let metrics = &report.metrics;
    println!("License compliance for {} (as of {})", report.owner, report.today);
    println!(
        "- {} employees | {} licenses | {:.2} licenses per employee",
        metrics.total_employees, metrics.total_employee_licenses, metrics.license_avg
    );
    println!(
        "- {} expired | {} expiring soon | {:.2}% compliant",
        metrics.expired_count, metrics.expiring_soon, metrics.compliance_rate
    );
    println!("- {} notifications", metrics.notification_count);

    render_distribution("Active licenses by type", &report.active_licenses);
    render_distribution("Expired licenses by type", &report.expired_licenses);

    println!("\nUpcoming expirations");
    for bucket in &report.expiring_by_month {
        println!("- {}: {}", bucket.month, bucket.count);
    }

    if !report.skipped.is_empty() {
        println!("\nSkipped records (unreadable expiration date)");
        for entry in &report.skipped {
            println!(
                "- assignment {}: '{}'",
                entry.assignment_id, entry.raw_expiration
            );
        }
    }
}

fn render_distribution(title: &str, points: &[LicenseDistributionPoint]) {
    if points.is_empty() {
        println!("\n{title}: none");
        return;
    }

    println!("\n{title}");
    for point in points {
        println!("- {}: {}", point.license_name, point.count);
    }
}
