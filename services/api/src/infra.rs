use accredit_track::compliance::{
    AssignmentImportError, AssignmentImporter, Clock, ComplianceSource, LicenseAssignment,
    OwnerId, SourceError,
};
use accredit_track::config::DataConfig;
use chrono::{Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wall clock in the server's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Owner-scoped snapshot held in memory, seeded from CSV exports.
#[derive(Default, Clone)]
pub(crate) struct InMemoryComplianceSource {
    assignments: Arc<Mutex<HashMap<OwnerId, Vec<LicenseAssignment>>>>,
    employees: Arc<Mutex<HashMap<OwnerId, usize>>>,
    notifications: Arc<Mutex<HashMap<OwnerId, usize>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, SourceError> {
    mutex
        .lock()
        .map_err(|_| SourceError::Unavailable("in-memory store poisoned".to_string()))
}

impl InMemoryComplianceSource {
    pub(crate) fn load(data: &DataConfig) -> Result<Self, AssignmentImportError> {
        let assignments = match &data.assignments_csv {
            Some(path) => AssignmentImporter::assignments_from_path(path)?,
            None => Vec::new(),
        };
        let employees = match &data.employees_csv {
            Some(path) => Some(AssignmentImporter::employee_counts_from_path(path)?),
            None => None,
        };
        Ok(Self::from_exports(assignments, employees))
    }

    /// Without a roster, an owner's employee count is the number of distinct
    /// employees holding at least one assignment.
    pub(crate) fn from_exports(
        assignments: Vec<LicenseAssignment>,
        roster: Option<BTreeMap<OwnerId, usize>>,
    ) -> Self {
        let mut by_owner: HashMap<OwnerId, Vec<LicenseAssignment>> = HashMap::new();
        for assignment in assignments {
            by_owner
                .entry(assignment.owner_id.clone())
                .or_default()
                .push(assignment);
        }

        let employees: HashMap<OwnerId, usize> = match roster {
            Some(roster) => roster.into_iter().collect(),
            None => by_owner
                .iter()
                .map(|(owner, assignments)| {
                    let distinct: HashSet<_> =
                        assignments.iter().map(|assignment| assignment.employee_id).collect();
                    (owner.clone(), distinct.len())
                })
                .collect(),
        };

        Self {
            assignments: Arc::new(Mutex::new(by_owner)),
            employees: Arc::new(Mutex::new(employees)),
            notifications: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub(crate) fn set_notification_count(
        &self,
        owner: OwnerId,
        count: usize,
    ) -> Result<(), SourceError> {
        lock(&self.notifications)?.insert(owner, count);
        Ok(())
    }

    pub(crate) fn owner_count(&self) -> usize {
        lock(&self.assignments).map(|guard| guard.len()).unwrap_or(0)
    }
}

impl ComplianceSource for InMemoryComplianceSource {
    fn fetch_assignments(&self, owner: &OwnerId) -> Result<Vec<LicenseAssignment>, SourceError> {
        Ok(lock(&self.assignments)?
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_total_employees(&self, owner: &OwnerId) -> Result<usize, SourceError> {
        Ok(lock(&self.employees)?.get(owner).copied().unwrap_or(0))
    }

    fn fetch_notification_count(&self, owner: &OwnerId) -> Result<usize, SourceError> {
        Ok(lock(&self.notifications)?.get(owner).copied().unwrap_or(0))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
