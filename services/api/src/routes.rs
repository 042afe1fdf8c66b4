use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use handset_advisor::advisory::{advisory_router, AdvisoryGateway, AdvisoryService, AdvisoryStore};
use handset_advisor::error::AppError;
use handset_advisor::pricing::{
    Carrier, CostLineItem, DeviceCatalogEntry, PlanInput, PlanQuote, PlanSelection,
    ReferenceCatalog,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct CatalogResponse {
    pub(crate) models: &'static [DeviceCatalogEntry],
    pub(crate) carriers: &'static [Carrier],
    pub(crate) monthly_fees: &'static [u32],
    pub(crate) contract_terms: &'static [u32],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) default_selection: Option<PlanSelection>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuoteResponse {
    #[serde(flatten)]
    pub(crate) quote: PlanQuote,
    pub(crate) line_items: Vec<CostLineItem>,
}

pub(crate) fn with_pricing_routes<G, S>(service: Arc<AdvisoryService<G, S>>) -> axum::Router
where
    G: AdvisoryGateway + 'static,
    S: AdvisoryStore + 'static,
{
    advisory_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/catalog", axum::routing::get(catalog_endpoint))
        .route("/api/v1/quote", axum::routing::post(quote_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn catalog_endpoint() -> Json<CatalogResponse> {
    let catalog = ReferenceCatalog::standard();
    Json(CatalogResponse {
        models: catalog.models,
        carriers: catalog.carriers,
        monthly_fees: catalog.monthly_fees,
        contract_terms: catalog.contract_terms,
        default_selection: catalog.default_selection(),
    })
}

pub(crate) async fn quote_endpoint(
    Json(payload): Json<PlanInput>,
) -> Result<Json<QuoteResponse>, AppError> {
    let catalog = ReferenceCatalog::standard();
    let selection = PlanSelection::from_input(catalog, payload)?;
    let quote = PlanQuote::build(catalog, &selection)?;
    let line_items = quote.line_items();

    Ok(Json(QuoteResponse { quote, line_items }))
}
