use serde::Serialize;

/// Dashboard summary for one owner at one reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_employees: usize,
    pub expired_count: usize,
    pub expiring_soon: usize,
    pub license_avg: f64,
    pub notification_count: usize,
    pub compliance_rate: f64,
    pub total_employee_licenses: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDistributionPoint {
    pub count: usize,
    pub license_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyForecastBucket {
    pub count: usize,
    pub month: String,
}
