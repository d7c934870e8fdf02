use super::classifier::TemporalClassifier;
use super::domain::{Evaluated, ExpirationStatus, LicenseAssignment, SkippedAssignment};
use super::views::LicenseDistributionPoint;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Subsets offered by the license chart reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionFilter {
    /// Not yet expired, including licenses inside the soon window.
    Active,
    Expired,
}

impl DistributionFilter {
    pub const fn matches(self, status: ExpirationStatus) -> bool {
        match self {
            Self::Active => !status.is_expired(),
            Self::Expired => status.is_expired(),
        }
    }
}

/// Count assignments per license name for the statuses accepted by
/// `predicate`.
///
/// Names are compared exactly, so differently cased names are separate
/// groups. Groups come back sorted by name; names with no matching
/// assignment are omitted.
pub fn group_by_license_type<F>(
    assignments: &[LicenseAssignment],
    reference: NaiveDate,
    classifier: &TemporalClassifier,
    predicate: F,
) -> Evaluated<Vec<LicenseDistributionPoint>>
where
    F: Fn(ExpirationStatus) -> bool,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut skipped = Vec::new();

    for assignment in assignments {
        match classifier.classify_assignment(reference, assignment) {
            Ok(status) if predicate(status) => {
                *counts.entry(assignment.license_name.as_str()).or_default() += 1;
            }
            Ok(_) => {}
            Err(err) => skipped.push(SkippedAssignment {
                assignment_id: assignment.id,
                raw_expiration: err.raw,
            }),
        }
    }

    let points = counts
        .into_iter()
        .map(|(license_name, count)| LicenseDistributionPoint {
            count,
            license_name: license_name.to_string(),
        })
        .collect();

    Evaluated {
        value: points,
        skipped,
    }
}

/// Convenience wrapper applying one of the named report filters.
pub fn distribution(
    assignments: &[LicenseAssignment],
    reference: NaiveDate,
    classifier: &TemporalClassifier,
    filter: DistributionFilter,
) -> Evaluated<Vec<LicenseDistributionPoint>> {
    group_by_license_type(assignments, reference, classifier, |status| {
        filter.matches(status)
    })
}
