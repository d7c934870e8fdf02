use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{AssignmentId, EmployeeId, LicenseAssignment, LicenseTypeId, OwnerId};

#[derive(Debug, thiserror::Error)]
pub enum AssignmentImportError {
    #[error("failed to read export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads store exports of license assignments and employee rosters.
pub struct AssignmentImporter;

impl AssignmentImporter {
    pub fn assignments_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<LicenseAssignment>, AssignmentImportError> {
        let file = std::fs::File::open(path)?;
        Self::assignments_from_reader(file)
    }

    /// Date cells are kept verbatim; blank cells become `None`.
    pub fn assignments_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<LicenseAssignment>, AssignmentImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut assignments = Vec::new();
        for record in csv_reader.deserialize::<AssignmentRow>() {
            assignments.push(record?.into_assignment());
        }
        Ok(assignments)
    }

    pub fn employee_counts_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<BTreeMap<OwnerId, usize>, AssignmentImportError> {
        let file = std::fs::File::open(path)?;
        Self::employee_counts_from_reader(file)
    }

    /// Number of roster rows per owner.
    pub fn employee_counts_from_reader<R: Read>(
        reader: R,
    ) -> Result<BTreeMap<OwnerId, usize>, AssignmentImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut counts = BTreeMap::new();
        for record in csv_reader.deserialize::<EmployeeRow>() {
            let row = record?;
            *counts.entry(OwnerId(row.owner_id)).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentRow {
    id: i64,
    employee_id: i64,
    license_id: i64,
    license_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    issue_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    exp_date: Option<String>,
    owner_id: String,
}

impl AssignmentRow {
    fn into_assignment(self) -> LicenseAssignment {
        LicenseAssignment {
            id: AssignmentId(self.id),
            employee_id: EmployeeId(self.employee_id),
            license_type_id: LicenseTypeId(self.license_id),
            license_name: self.license_name,
            issue_date: self.issue_date,
            expiration_date: self.exp_date,
            owner_id: OwnerId(self.owner_id),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeRow {
    owner_id: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
