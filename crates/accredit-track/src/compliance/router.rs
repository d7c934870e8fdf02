use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::distribution::DistributionFilter;
use super::domain::{Evaluated, OwnerId};
use super::service::{ComplianceDashboardService, DashboardError};
use super::source::{Clock, ComplianceSource};
use crate::error::AppError;

/// Header carrying the subject id already validated by the auth layer.
pub const OWNER_HEADER: &str = "x-owner-id";

type SharedService<S, C> = Arc<ComplianceDashboardService<S, C>>;

/// Optional pin of the reference date, `?today=YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Router builder exposing the dashboard reports.
pub fn dashboard_router<S, C>(service: SharedService<S, C>) -> Router
where
    S: ComplianceSource + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/metrics", get(metrics_handler::<S, C>))
        .route(
            "/metrics/license-chart-data",
            get(active_distribution_handler::<S, C>),
        )
        .route(
            "/metrics/license-chart-data-expired",
            get(expired_distribution_handler::<S, C>),
        )
        .route(
            "/metrics/license-chart-data-expiring-soon",
            get(forecast_handler::<S, C>),
        )
        .with_state(service)
}

pub(crate) fn owner_from_headers(headers: &HeaderMap) -> Option<OwnerId> {
    headers
        .get(OWNER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| OwnerId(value.to_string()))
}

fn missing_owner() -> Response {
    let payload = json!({ "error": "owner not found" });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

fn respond<T: Serialize>(result: Result<Evaluated<T>, DashboardError>) -> Response {
    match result {
        Ok(report) => (StatusCode::OK, Json(report.value)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn metrics_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    headers: HeaderMap,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    S: ComplianceSource + 'static,
    C: Clock + 'static,
{
    let Some(owner) = owner_from_headers(&headers) else {
        return missing_owner();
    };
    respond(service.metrics(&owner, query.today))
}

pub(crate) async fn active_distribution_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    headers: HeaderMap,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    S: ComplianceSource + 'static,
    C: Clock + 'static,
{
    let Some(owner) = owner_from_headers(&headers) else {
        return missing_owner();
    };
    respond(service.license_distribution(&owner, DistributionFilter::Active, query.today))
}

pub(crate) async fn expired_distribution_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    headers: HeaderMap,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    S: ComplianceSource + 'static,
    C: Clock + 'static,
{
    let Some(owner) = owner_from_headers(&headers) else {
        return missing_owner();
    };
    respond(service.license_distribution(&owner, DistributionFilter::Expired, query.today))
}

pub(crate) async fn forecast_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    headers: HeaderMap,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    S: ComplianceSource + 'static,
    C: Clock + 'static,
{
    let Some(owner) = owner_from_headers(&headers) else {
        return missing_owner();
    };
    respond(service.expiration_forecast(&owner, query.today))
}
