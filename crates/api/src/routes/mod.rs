pub mod admin;
pub mod auth;
pub mod campaigns;
pub mod health;
pub mod phases;
pub mod templates;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                             register (public)
/// /auth/login                                login (public)
/// /auth/me                                   current user (requires auth)
///
/// /templates                                 list, create
/// /templates/{id}                            get, update, delete
/// /templates/{id}/status                     lifecycle transition (PUT)
/// /templates/{id}/publish                    publish + snapshot (POST)
/// /templates/{id}/clone                      clone (POST)
/// /templates/{id}/phases                     list, create
/// /templates/{id}/phases/reorder             reorder batch (PUT)
/// /templates/{id}/versions                   list, snapshot (GET, POST)
/// /templates/{id}/rollback/{version_id}      rollback (POST)
/// /templates/{id}/activity                   activity feed (GET)
///
/// /phases/{id}                               update, delete
/// /phases/{id}/branching                     set branch targets (PUT)
///
/// /versions/{id}                             get with snapshot
///
/// /campaigns                                 create
/// /campaigns/{id}                            get
/// /campaigns/{id}/phases                     list phase copies
///
/// /admin/templates                           all templates (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/templates", templates::router())
        .nest("/phases", phases::router())
        .nest("/versions", versions::router())
        .nest("/campaigns", campaigns::router())
        .nest("/admin", admin::router())
}
