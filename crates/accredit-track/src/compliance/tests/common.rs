use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::compliance::domain::{
    AssignmentId, EmployeeId, LicenseAssignment, LicenseTypeId, OwnerId,
};
use crate::compliance::service::ComplianceDashboardService;
use crate::compliance::source::{ComplianceSource, FixedClock, SourceError};
use crate::config::ComplianceConfig;

pub(super) const OWNER: &str = "auth0|owner-1";

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
}

pub(super) fn owner() -> OwnerId {
    OwnerId(OWNER.to_string())
}

pub(super) fn assignment(id: i64, name: &str, expiration: &str) -> LicenseAssignment {
    LicenseAssignment {
        id: AssignmentId(id),
        employee_id: EmployeeId(id % 4),
        license_type_id: LicenseTypeId(name.len() as i64),
        license_name: name.to_string(),
        issue_date: Some("2023-01-01".to_string()),
        expiration_date: Some(expiration.to_string()),
        owner_id: owner(),
    }
}

/// Three expired, two expiring soon and five active assignments as of
/// 2024-01-15.
pub(super) fn portfolio() -> Vec<LicenseAssignment> {
    let mut assignments = Vec::new();
    for id in 1..=3 {
        assignments.push(assignment(id, "CPR", "2024-01-01"));
    }
    for id in 4..=5 {
        assignments.push(assignment(id, "RN", "2024-01-20"));
    }
    for id in 6..=10 {
        assignments.push(assignment(id, "CDL", "2024-06-01"));
    }
    assignments
}

#[derive(Default, Clone)]
pub(super) struct MemorySource {
    assignments: Arc<Mutex<HashMap<OwnerId, Vec<LicenseAssignment>>>>,
    employees: Arc<Mutex<HashMap<OwnerId, usize>>>,
    notifications: Arc<Mutex<HashMap<OwnerId, usize>>>,
}

impl MemorySource {
    pub(super) fn seeded(
        assignments: Vec<LicenseAssignment>,
        employees: usize,
        notifications: usize,
    ) -> Self {
        let source = Self::default();
        source
            .assignments
            .lock()
            .expect("source mutex poisoned")
            .insert(owner(), assignments);
        source
            .employees
            .lock()
            .expect("source mutex poisoned")
            .insert(owner(), employees);
        source
            .notifications
            .lock()
            .expect("source mutex poisoned")
            .insert(owner(), notifications);
        source
    }
}

impl ComplianceSource for MemorySource {
    fn fetch_assignments(&self, owner: &OwnerId) -> Result<Vec<LicenseAssignment>, SourceError> {
        let guard = self.assignments.lock().expect("source mutex poisoned");
        Ok(guard.get(owner).cloned().unwrap_or_default())
    }

    fn fetch_total_employees(&self, owner: &OwnerId) -> Result<usize, SourceError> {
        let guard = self.employees.lock().expect("source mutex poisoned");
        Ok(guard.get(owner).copied().unwrap_or(0))
    }

    fn fetch_notification_count(&self, owner: &OwnerId) -> Result<usize, SourceError> {
        let guard = self.notifications.lock().expect("source mutex poisoned");
        Ok(guard.get(owner).copied().unwrap_or(0))
    }
}

/// Fails the employee count lookup, as a lost database connection would.
pub(super) struct UnavailableSource;

impl ComplianceSource for UnavailableSource {
    fn fetch_assignments(&self, _owner: &OwnerId) -> Result<Vec<LicenseAssignment>, SourceError> {
        Err(SourceError::Unavailable("connection reset".to_string()))
    }

    fn fetch_total_employees(&self, _owner: &OwnerId) -> Result<usize, SourceError> {
        Err(SourceError::Unavailable("connection reset".to_string()))
    }

    fn fetch_notification_count(&self, _owner: &OwnerId) -> Result<usize, SourceError> {
        Ok(0)
    }
}

/// Reports every lookup as missing.
pub(super) struct MissingSource;

impl ComplianceSource for MissingSource {
    fn fetch_assignments(&self, _owner: &OwnerId) -> Result<Vec<LicenseAssignment>, SourceError> {
        Err(SourceError::NotFound)
    }

    fn fetch_total_employees(&self, _owner: &OwnerId) -> Result<usize, SourceError> {
        Err(SourceError::NotFound)
    }

    fn fetch_notification_count(&self, _owner: &OwnerId) -> Result<usize, SourceError> {
        Err(SourceError::NotFound)
    }
}

pub(super) fn service_with<S>(source: S) -> Arc<ComplianceDashboardService<S, FixedClock>>
where
    S: ComplianceSource + 'static,
{
    Arc::new(ComplianceDashboardService::new(
        Arc::new(source),
        Arc::new(FixedClock(reference_date())),
        ComplianceConfig::default(),
    ))
}

pub(super) async fn response_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).expect("json body");
    (status, body)
}
