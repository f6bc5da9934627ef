//! Route definitions for template versions addressed by version id.
//!
//! Registered under `/versions`. Per-template version operations live
//! on the template's routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::versions;
use crate::state::AppState;

/// Version routes, registered as `/versions`.
///
/// ```text
/// GET /{id}  get_version (includes the snapshot)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(versions::get_version))
}
