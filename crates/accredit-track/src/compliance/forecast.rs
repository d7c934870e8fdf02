use super::classifier::parse_calendar_date;
use super::domain::{Evaluated, LicenseAssignment, SkippedAssignment};
use super::views::MonthlyForecastBucket;
use chrono::{Months, NaiveDate};

pub const DEFAULT_FORECAST_MONTHS: u32 = 5;

const MONTH_LABEL_FORMAT: &str = "%B";

/// Half-open window `[start, end)` for one forecast month.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ForecastWindow {
    start: NaiveDate,
    end: NaiveDate,
    count: usize,
}

impl ForecastWindow {
    fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

fn offset(reference: NaiveDate, months: u32) -> NaiveDate {
    reference
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn windows(reference: NaiveDate, months_ahead: u32) -> Vec<ForecastWindow> {
    (1..=months_ahead)
        .map(|k| ForecastWindow {
            start: offset(reference, k - 1),
            end: offset(reference, k),
            count: 0,
        })
        .collect()
}

/// Count upcoming expirations per month for the next `months_ahead` months.
///
/// Bucket `k` covers `[reference + (k-1) months, reference + k months)` and
/// is labelled with the month name of its upper bound. Every bound is
/// measured from `reference`, so month-end clamping never opens gaps between
/// buckets. Expired assignments and those beyond the last bucket are not
/// counted; assignments without an expiration date never appear.
pub fn forecast_by_month(
    assignments: &[LicenseAssignment],
    reference: NaiveDate,
    months_ahead: u32,
) -> Evaluated<Vec<MonthlyForecastBucket>> {
    let mut windows = windows(reference, months_ahead);
    let mut skipped = Vec::new();

    for assignment in assignments {
        let Some(raw) = assignment.expiration_date.as_deref() else {
            continue;
        };

        match parse_calendar_date(raw) {
            Ok(expiration) => {
                if let Some(window) = windows.iter_mut().find(|window| window.contains(expiration))
                {
                    window.count += 1;
                }
            }
            Err(err) => skipped.push(SkippedAssignment {
                assignment_id: assignment.id,
                raw_expiration: err.raw,
            }),
        }
    }

    let buckets = windows
        .into_iter()
        .map(|window| MonthlyForecastBucket {
            count: window.count,
            month: window.end.format(MONTH_LABEL_FORMAT).to_string(),
        })
        .collect();

    Evaluated {
        value: buckets,
        skipped,
    }
}
