use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryComplianceSource, SystemClock};
use crate::routes::with_dashboard_routes;
use accredit_track::compliance::ComplianceDashboardService;
use accredit_track::config::AppConfig;
use accredit_track::error::AppError;
use accredit_track::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = Arc::new(InMemoryComplianceSource::load(&config.data)?);
    info!(owners = source.owner_count(), "compliance data loaded");

    let service = Arc::new(ComplianceDashboardService::new(
        source,
        Arc::new(SystemClock),
        config.compliance,
    ));

    let app = with_dashboard_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        soon_window_days = config.compliance.soon_window_days,
        forecast_months = config.compliance.forecast_months,
        "license compliance service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
