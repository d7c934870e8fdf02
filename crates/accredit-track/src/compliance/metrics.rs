use super::classifier::TemporalClassifier;
use super::domain::{Evaluated, LicenseAssignment};
use super::views::Metrics;
use chrono::NaiveDate;

/// Divide two counts, yielding zero instead of NaN or infinity when the
/// denominator is zero.
pub fn guarded_ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Percentage of assignments that are not expired, rounded to two decimals
/// with halves away from zero.
///
/// The rate is computed in whole hundredths of a percent so that exact ties
/// such as 23/160 (14.375%) round up instead of drifting below the half.
pub fn compliance_rate(total: usize, expired: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let kept = total.saturating_sub(expired) as u128;
    let total = total as u128;
    let hundredths = (20_000 * kept + total) / (2 * total);
    hundredths as f64 / 100.0
}

/// Summarise an owner's assignments as of `reference`.
///
/// Records whose expiration cannot be parsed still count toward
/// `total_employee_licenses` but are left out of every status-derived
/// figure, the compliance rate included, and are returned in `skipped`.
pub fn aggregate(
    assignments: &[LicenseAssignment],
    total_employees: usize,
    notification_count: usize,
    reference: NaiveDate,
    classifier: &TemporalClassifier,
) -> Evaluated<Metrics> {
    let partition = classifier.partition(reference, assignments);
    let total = assignments.len();
    let expired_count = partition.expired.len();

    let metrics = Metrics {
        total_employees,
        expired_count,
        expiring_soon: partition.expiring_soon.len(),
        license_avg: guarded_ratio(total, total_employees),
        notification_count,
        compliance_rate: compliance_rate(partition.classified(), expired_count),
        total_employee_licenses: total,
    };

    Evaluated {
        value: metrics,
        skipped: partition.skipped,
    }
}
