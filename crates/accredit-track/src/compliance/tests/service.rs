use super::common::*;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::compliance::distribution::DistributionFilter;
use crate::compliance::domain::AssignmentId;
use crate::compliance::service::{ComplianceDashboardService, DashboardError};
use crate::compliance::source::{FixedClock, SourceError};
use crate::compliance::views::LicenseDistributionPoint;
use crate::config::ComplianceConfig;

#[test]
fn metrics_use_injected_clock() {
    let service = service_with(MemorySource::seeded(portfolio(), 5, 3));

    let report = service.metrics(&owner(), None).expect("metrics computed");

    assert!(report.is_complete());
    assert_eq!(report.value.expired_count, 3);
    assert_eq!(report.value.expiring_soon, 2);
    assert_eq!(report.value.compliance_rate, 70.0);
    assert_eq!(report.value.license_avg, 2.0);
    assert_eq!(report.value.total_employees, 5);
    assert_eq!(report.value.notification_count, 3);
}

#[test]
fn explicit_reference_date_overrides_clock() {
    let service = service_with(MemorySource::seeded(portfolio(), 5, 0));
    let later = NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date");

    let report = service.metrics(&owner(), Some(later)).expect("metrics computed");

    assert_eq!(report.value.expired_count, 10);
    assert_eq!(report.value.compliance_rate, 0.0);
}

#[test]
fn unknown_owner_gets_zeroed_metrics() {
    let service = service_with(MemorySource::seeded(portfolio(), 5, 0));
    let stranger = crate::compliance::domain::OwnerId("someone-else".to_string());

    let report = service.metrics(&stranger, None).expect("metrics computed");

    assert_eq!(report.value.total_employee_licenses, 0);
    assert_eq!(report.value.compliance_rate, 0.0);
    assert_eq!(report.value.license_avg, 0.0);
}

#[test]
fn malformed_rows_surface_as_skipped() {
    let mut assignments = portfolio();
    assignments.push(assignment(99, "CPR", "31/12/2024"));
    let service = service_with(MemorySource::seeded(assignments, 5, 0));

    let report = service.metrics(&owner(), None).expect("metrics computed");

    assert!(!report.is_complete());
    assert_eq!(report.skipped[0].assignment_id, AssignmentId(99));
    assert_eq!(report.value.total_employee_licenses, 11);
    assert_eq!(report.value.expired_count, 3);
    assert_eq!(report.value.compliance_rate, 70.0);
}

#[test]
fn upstream_failure_is_not_masked_as_zero_metrics() {
    let service = service_with(UnavailableSource);

    match service.metrics(&owner(), None) {
        Err(DashboardError::Upstream(SourceError::Unavailable(reason))) => {
            assert_eq!(reason, "connection reset")
        }
        other => panic!("expected upstream failure, got {other:?}"),
    }
}

#[test]
fn distributions_split_active_and_expired() {
    let service = service_with(MemorySource::seeded(portfolio(), 5, 0));

    let active = service
        .license_distribution(&owner(), DistributionFilter::Active, None)
        .expect("distribution computed");
    assert_eq!(
        active.value,
        vec![
            LicenseDistributionPoint {
                count: 5,
                license_name: "CDL".to_string()
            },
            LicenseDistributionPoint {
                count: 2,
                license_name: "RN".to_string()
            },
        ]
    );

    let expired = service
        .license_distribution(&owner(), DistributionFilter::Expired, None)
        .expect("distribution computed");
    assert_eq!(
        expired.value,
        vec![LicenseDistributionPoint {
            count: 3,
            license_name: "CPR".to_string()
        }]
    );
}

#[test]
fn forecast_uses_configured_horizon() {
    let service = service_with(MemorySource::seeded(portfolio(), 5, 0));

    let report = service
        .expiration_forecast(&owner(), None)
        .expect("forecast computed");

    assert_eq!(report.value.len(), service.forecast_months() as usize);
    let counts: Vec<usize> = report.value.iter().map(|bucket| bucket.count).collect();
    assert_eq!(counts, vec![2, 0, 0, 0, 5]);
    assert_eq!(report.value[4].month, "June");
}

#[test]
fn narrower_soon_window_moves_licenses_to_active() {
    let service = ComplianceDashboardService::new(
        Arc::new(MemorySource::seeded(portfolio(), 5, 0)),
        Arc::new(FixedClock(reference_date())),
        ComplianceConfig {
            soon_window_days: 3,
            forecast_months: 5,
        },
    );
    assert_eq!(service.soon_window_days(), 3);

    let report = service.metrics(&owner(), None).expect("metrics computed");

    assert_eq!(report.value.expired_count, 3);
    assert_eq!(report.value.expiring_soon, 0);
    assert_eq!(report.value.compliance_rate, 70.0);
}
