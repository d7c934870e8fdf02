use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque subject id of the account that owns employees and licenses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(pub i64);

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseTypeId(pub i64);

/// One employee holding one license type, as delivered by the store.
///
/// Dates are kept as the raw strings the store produced. They are only
/// interpreted by the classifier, which is where malformed values surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseAssignment {
    pub id: AssignmentId,
    pub employee_id: EmployeeId,
    pub license_type_id: LicenseTypeId,
    pub license_name: String,
    pub issue_date: Option<String>,
    pub expiration_date: Option<String>,
    pub owner_id: OwnerId,
}

/// Where a license stands relative to the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationStatus {
    Expired,
    ExpiringSoon,
    Active,
}

impl ExpirationStatus {
    pub const fn is_expired(self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// A record left out of classification-derived figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedAssignment {
    pub assignment_id: AssignmentId,
    pub raw_expiration: String,
}

/// A computed report together with the records that could not be classified.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated<T> {
    pub value: T,
    pub skipped: Vec<SkippedAssignment>,
}

impl<T> Evaluated<T> {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
