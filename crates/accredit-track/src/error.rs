use crate::compliance::{AssignmentImportError, DashboardError, SourceError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(AssignmentImportError),
    Dashboard(DashboardError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Dashboard(err) => write!(f, "dashboard error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Dashboard(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Import(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Dashboard(DashboardError::Upstream(SourceError::NotFound)) => {
                (StatusCode::NOT_FOUND, "data not found".to_string())
            }
            AppError::Dashboard(err) => {
                error!(error = %err, "dashboard report failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to retrieve dashboard metrics".to_string(),
                )
            }
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<AssignmentImportError> for AppError {
    fn from(value: AssignmentImportError) -> Self {
        Self::Import(value)
    }
}

impl From<SourceError> for AppError {
    fn from(value: SourceError) -> Self {
        Self::Dashboard(DashboardError::Upstream(value))
    }
}

impl From<DashboardError> for AppError {
    fn from(value: DashboardError) -> Self {
        Self::Dashboard(value)
    }
}
