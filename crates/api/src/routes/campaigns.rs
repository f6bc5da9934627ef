//! Route definitions for campaigns.
//!
//! Registered under `/campaigns`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Campaign routes, registered as `/campaigns`.
///
/// ```text
/// POST /              create_campaign
/// GET  /{id}          get_campaign
/// GET  /{id}/phases   list_campaign_phases
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(campaigns::create_campaign))
        .route("/{id}", get(campaigns::get_campaign))
        .route("/{id}/phases", get(campaigns::list_campaign_phases))
}
