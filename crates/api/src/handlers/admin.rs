//! Admin-only handlers.

use axum::extract::{Query, State};
use axum::Json;

use pathways_db::models::template::Template;
use pathways_db::repositories::{TemplateFilter, TemplateRepo};

use crate::error::AppResult;
use crate::guard::require_admin;
use crate::handlers::templates::ListTemplatesQuery;
use crate::middleware::auth::AuthUser;
use crate::query::{clamp_limit, clamp_offset};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/templates
///
/// Every template in the system regardless of owner or visibility.
pub async fn list_all_templates(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListTemplatesQuery>,
) -> AppResult<Json<DataResponse<Vec<Template>>>> {
    require_admin(&auth)?;

    let filter = TemplateFilter {
        status: params.status,
        tag: params.tag,
        limit: clamp_limit(params.limit),
        offset: clamp_offset(params.offset),
    };

    let templates =
        TemplateRepo::list_visible(&state.pool, auth.user_id, true, &filter).await?;
    Ok(Json(DataResponse { data: templates }))
}
