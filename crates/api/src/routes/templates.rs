//! Route definitions for pathway templates.
//!
//! Registered under `/templates`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{phases, templates, versions};
use crate::state::AppState;

/// Template routes, registered as `/templates`.
///
/// ```text
/// GET    /                            list_templates
/// POST   /                            create_template
/// GET    /{id}                        get_template
/// PUT    /{id}                        update_template
/// DELETE /{id}                        delete_template
/// PUT    /{id}/status                 update_status
/// POST   /{id}/publish                publish_template
/// POST   /{id}/clone                  clone_template
/// GET    /{id}/phases                 list_phases
/// POST   /{id}/phases                 create_phase
/// PUT    /{id}/phases/reorder         reorder_phases
/// GET    /{id}/versions               list_versions
/// POST   /{id}/versions               create_version
/// POST   /{id}/rollback/{version_id}  rollback_template
/// GET    /{id}/activity               list_activity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/{id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/{id}/status", put(templates::update_status))
        .route("/{id}/publish", post(templates::publish_template))
        .route("/{id}/clone", post(templates::clone_template))
        .route(
            "/{id}/phases",
            get(phases::list_phases).post(phases::create_phase),
        )
        .route("/{id}/phases/reorder", put(phases::reorder_phases))
        .route(
            "/{id}/versions",
            get(versions::list_versions).post(versions::create_version),
        )
        .route(
            "/{id}/rollback/{version_id}",
            post(versions::rollback_template),
        )
        .route("/{id}/activity", get(templates::list_activity))
}
