//! Route definitions for admin-only operations.
//!
//! Registered under `/admin`.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes, registered as `/admin`.
///
/// ```text
/// GET /templates  list_all_templates (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/templates", get(admin::list_all_templates))
}
