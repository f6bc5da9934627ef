//! Liveness endpoint, mounted at the root rather than under `/api/v1`
//! so load balancers can probe it unversioned.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
///
/// Reports `degraded` instead of failing when the database is down, so
/// the process itself still answers.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = pathways_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
