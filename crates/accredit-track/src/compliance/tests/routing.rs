use super::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::compliance::router::{dashboard_router, OWNER_HEADER};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(OWNER_HEADER, OWNER)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn metrics_endpoint_returns_dashboard_fields() {
    let app = dashboard_router(service_with(MemorySource::seeded(portfolio(), 4, 2)));

    let response = app.oneshot(get("/metrics")).await.expect("response");
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "totalEmployees": 4,
            "expiredCount": 3,
            "expiringSoon": 2,
            "licenseAvg": 2.5,
            "notificationCount": 2,
            "complianceRate": 70.0,
            "totalEmployeeLicenses": 10
        })
    );
}

#[tokio::test]
async fn chart_endpoints_return_grouped_counts() {
    let app = dashboard_router(service_with(MemorySource::seeded(portfolio(), 4, 0)));

    let response = app
        .clone()
        .oneshot(get("/metrics/license-chart-data"))
        .await
        .expect("response");
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "count": 5, "licenseName": "CDL" },
            { "count": 2, "licenseName": "RN" }
        ])
    );

    let response = app
        .oneshot(get("/metrics/license-chart-data-expired"))
        .await
        .expect("response");
    let (_, body) = response_json(response).await;
    assert_eq!(body, json!([{ "count": 3, "licenseName": "CPR" }]));
}

#[tokio::test]
async fn forecast_endpoint_honours_reference_override() {
    let app = dashboard_router(service_with(MemorySource::seeded(portfolio(), 4, 0)));

    let response = app
        .oneshot(get(
            "/metrics/license-chart-data-expiring-soon?today=2024-05-01",
        ))
        .await
        .expect("response");
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "count": 0, "month": "June" },
            { "count": 5, "month": "July" },
            { "count": 0, "month": "August" },
            { "count": 0, "month": "September" },
            { "count": 0, "month": "October" }
        ])
    );
}

#[tokio::test]
async fn missing_owner_is_unauthorized() {
    let app = dashboard_router(service_with(MemorySource::seeded(portfolio(), 4, 0)));
    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .expect("request builds");

    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upstream_not_found_maps_to_404() {
    let app = dashboard_router(service_with(MissingSource));

    let response = app.oneshot(get("/metrics")).await.expect("response");
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "data not found");
}

#[tokio::test]
async fn upstream_failure_maps_to_500() {
    let app = dashboard_router(service_with(UnavailableSource));

    let response = app
        .oneshot(get("/metrics/license-chart-data"))
        .await
        .expect("response");

    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "failed to retrieve dashboard metrics");
}
