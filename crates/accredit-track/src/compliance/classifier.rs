use super::domain::{ExpirationStatus, LicenseAssignment, SkippedAssignment};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

pub const DEFAULT_SOON_WINDOW_DAYS: u32 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// An expiration value that does not name a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a calendar date")]
pub struct MalformedDate {
    pub raw: String,
}

/// Parse a store date, discarding any time-of-day component.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, MalformedDate> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|timestamp| timestamp.date())
        .ok_or_else(|| MalformedDate {
            raw: raw.to_string(),
        })
}

/// Classify an expiration date against the reference date.
///
/// Expired means strictly before the reference date, so a license expiring
/// today is still valid. The soon window is exclusive at its upper end.
pub fn classify(
    reference: NaiveDate,
    expiration: NaiveDate,
    soon_window_days: u32,
) -> ExpirationStatus {
    if expiration < reference {
        return ExpirationStatus::Expired;
    }

    let within_window = match reference.checked_add_days(Days::new(u64::from(soon_window_days))) {
        Some(horizon) => expiration < horizon,
        None => true,
    };

    if within_window {
        ExpirationStatus::ExpiringSoon
    } else {
        ExpirationStatus::Active
    }
}

/// Classifier bound to a soon window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalClassifier {
    soon_window_days: u32,
}

impl Default for TemporalClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SOON_WINDOW_DAYS)
    }
}

impl TemporalClassifier {
    pub const fn new(soon_window_days: u32) -> Self {
        Self { soon_window_days }
    }

    pub const fn soon_window_days(&self) -> u32 {
        self.soon_window_days
    }

    pub fn classify(&self, reference: NaiveDate, expiration: NaiveDate) -> ExpirationStatus {
        classify(reference, expiration, self.soon_window_days)
    }

    pub fn classify_raw(
        &self,
        reference: NaiveDate,
        raw_expiration: &str,
    ) -> Result<ExpirationStatus, MalformedDate> {
        parse_calendar_date(raw_expiration).map(|expiration| self.classify(reference, expiration))
    }

    /// Assignments without an expiration date never lapse and count as active.
    pub fn classify_assignment(
        &self,
        reference: NaiveDate,
        assignment: &LicenseAssignment,
    ) -> Result<ExpirationStatus, MalformedDate> {
        match assignment.expiration_date.as_deref() {
            Some(raw) => self.classify_raw(reference, raw),
            None => Ok(ExpirationStatus::Active),
        }
    }

    pub fn partition<'a>(
        &self,
        reference: NaiveDate,
        assignments: &'a [LicenseAssignment],
    ) -> StatusPartition<'a> {
        let mut partition = StatusPartition::default();
        for assignment in assignments {
            match self.classify_assignment(reference, assignment) {
                Ok(status) => partition.bucket_mut(status).push(assignment),
                Err(err) => partition.skipped.push(SkippedAssignment {
                    assignment_id: assignment.id,
                    raw_expiration: err.raw,
                }),
            }
        }
        partition
    }
}

/// Assignments split by status, plus the ones whose dates could not be read.
#[derive(Debug, Default)]
pub struct StatusPartition<'a> {
    pub expired: Vec<&'a LicenseAssignment>,
    pub expiring_soon: Vec<&'a LicenseAssignment>,
    pub active: Vec<&'a LicenseAssignment>,
    pub skipped: Vec<SkippedAssignment>,
}

impl<'a> StatusPartition<'a> {
    fn bucket_mut(&mut self, status: ExpirationStatus) -> &mut Vec<&'a LicenseAssignment> {
        match status {
            ExpirationStatus::Expired => &mut self.expired,
            ExpirationStatus::ExpiringSoon => &mut self.expiring_soon,
            ExpirationStatus::Active => &mut self.active,
        }
    }

    pub fn classified(&self) -> usize {
        self.expired.len() + self.expiring_soon.len() + self.active.len()
    }
}
