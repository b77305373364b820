//! `axum` router (SPEC_FULL.md §4.4 "HTTP surface", component C10):
//! `POST /v1/estimate`, `GET /healthz`, `GET /readyz`. `tower-http`'s
//! `TraceLayer`/`TimeoutLayer` wrap the router, matching the teacher's
//! `tower`/`tower-http` dependency pair.

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower::{BoxError, ServiceBuilder};
use tracing::Instrument;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::cache::RefreshingCache;
use crate::error::ServiceError;
use crate::orchestrator::Orchestrator;
use crate::request::EstimateRequest;
use crate::response::EstimateResponse;

pub struct AppState {
    pub orchestrator: Orchestrator,
    pub pcp_specialties: Arc<RefreshingCache<std::collections::HashSet<String>>>,
    pub readiness_staleness_budget: Duration,
}

pub fn router(state: Arc<AppState>, request_deadline: Duration) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_deadline));

    Router::new()
        .route("/v1/estimate", post(estimate))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(middleware)
        .with_state(state)
}

/// The only middleware layered below this handler is [`TimeoutLayer`], so
/// any error reaching it is a deadline elapsing (SPEC_FULL.md §7
/// `Cancelled`).
async fn handle_timeout(_error: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::GATEWAY_TIMEOUT, Json(json!({ "code": "Cancelled", "message": "request deadline exceeded" })))
}

async fn estimate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, ServiceError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!(
        "estimate_request",
        request_id = %request_id,
        membership_id_hash = %hash_membership_id(&request.membership_id),
    );
    async move {
        let response = state.orchestrator.estimate(request).await?;
        Ok(Json(response))
    }
    .instrument(span)
    .await
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readyz(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let age = state.pcp_specialties.age();
    let stale = age > state.readiness_staleness_budget;
    Json(json!({
        "status": if stale { "stale" } else { "ok" },
        "pcpSpecialtyCacheAgeSecs": age.as_secs(),
    }))
}

/// Membership ids never reach `tracing` output directly (SPEC_FULL.md §4.4
/// "Logging"); a stable, non-reversible hash is what actually gets logged.
fn hash_membership_id(membership_id: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    membership_id.hash(&mut hasher);
    hasher.finish()
}
