use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::gateway::AdvisoryGateway;
use super::prompt::AdvisoryRequest;
use super::service::{AdvisoryService, AdvisoryServiceError};
use super::store::{AdvisoryId, AdvisoryStore, AdvisoryStoreError};
use crate::pricing::{PlanInput, PlanQuote, PlanSelection, ReferenceCatalog, UserProfile};

/// Plan configuration plus the profile the advisory should be tailored to.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisoryPayload {
    #[serde(flatten)]
    pub plan: PlanInput,
    #[serde(default)]
    pub profile: UserProfile,
}

/// Router exposing asynchronous advisory requests and their status.
pub fn advisory_router<G, S>(service: Arc<AdvisoryService<G, S>>) -> Router
where
    G: AdvisoryGateway + 'static,
    S: AdvisoryStore + 'static,
{
    Router::new()
        .route("/api/v1/advisory", post(request_handler::<G, S>))
        .route(
            "/api/v1/advisory/:advisory_id",
            get(status_handler::<G, S>),
        )
        .with_state(service)
}

pub(crate) async fn request_handler<G, S>(
    State(service): State<Arc<AdvisoryService<G, S>>>,
    axum::Json(payload): axum::Json<AdvisoryPayload>,
) -> Response
where
    G: AdvisoryGateway + 'static,
    S: AdvisoryStore + 'static,
{
    let catalog = ReferenceCatalog::standard();
    let quote = PlanSelection::from_input(catalog, payload.plan)
        .and_then(|selection| PlanQuote::build(catalog, &selection));
    let quote = match quote {
        Ok(quote) => quote,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    let request = AdvisoryRequest::from_quote(&quote, payload.profile);
    match service.submit(request) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.status_view())).into_response(),
        Err(AdvisoryServiceError::Busy) => {
            let payload = json!({ "error": "advisory generator busy, retry later" });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<G, S>(
    State(service): State<Arc<AdvisoryService<G, S>>>,
    Path(advisory_id): Path<String>,
) -> Response
where
    G: AdvisoryGateway + 'static,
    S: AdvisoryStore + 'static,
{
    let id = AdvisoryId(advisory_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(AdvisoryServiceError::Store(AdvisoryStoreError::NotFound)) => {
            let payload = json!({
                "advisory_id": id.0,
                "error": "advisory not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
