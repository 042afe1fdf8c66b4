use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAdvisoryStore};
use crate::routes::with_pricing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use handset_advisor::advisory::{AdvisoryService, GeminiClient};
use handset_advisor::config::AppConfig;
use handset_advisor::error::AppError;
use handset_advisor::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let gateway = GeminiClient::new(&config.advisory)?;
    if !gateway.is_configured() {
        warn!("ADVISORY_API_KEY not set; advisories will return the fallback message");
    }
    let store = Arc::new(InMemoryAdvisoryStore::with_capacity(
        config.advisory.store_capacity,
    ));
    let advisory_service = Arc::new(AdvisoryService::with_max_in_flight(
        Arc::new(gateway),
        store,
        config.advisory.max_in_flight,
    ));

    let app = with_pricing_routes(advisory_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, model = %config.advisory.model, "handset advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
