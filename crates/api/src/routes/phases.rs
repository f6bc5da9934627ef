//! Route definitions for individual phases.
//!
//! Registered under `/phases`. Listing and creation live on the owning
//! template's routes.

use axum::routing::put;
use axum::Router;

use crate::handlers::phases;
use crate::state::AppState;

/// Phase routes, registered as `/phases`.
///
/// ```text
/// PUT    /{id}            update_phase
/// DELETE /{id}            delete_phase
/// PUT    /{id}/branching  update_branching
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            put(phases::update_phase).delete(phases::delete_phase),
        )
        .route("/{id}/branching", put(phases::update_branching))
}
