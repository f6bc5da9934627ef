//! Handlers for template versions: immutable snapshots and rollback.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use pathways_core::error::CoreError;
use pathways_core::types::DbId;
use pathways_db::models::template::Template;
use pathways_db::models::template_version::{TemplateVersion, TemplateVersionSummary};
use pathways_db::repositories::TemplateVersionRepo;

use crate::activity::{self, events};
use crate::error::{AppError, AppResult};
use crate::guard;
use crate::middleware::auth::AuthUser;
use crate::query::{clamp_limit, clamp_offset};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/templates/{id}/versions
///
/// Snapshot the template's current state as the next version. Version
/// numbers are assigned monotonically inside the transaction.
pub async fn create_version(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<TemplateVersion>>)> {
    let access = guard::load_for_write(&state.pool, auth, template_id).await?;

    let version = TemplateVersionRepo::create(&state.pool, template_id, access.actor.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: template_id,
        }))?;

    activity::record(
        &state.pool,
        template_id,
        access.actor.user_id,
        events::VERSION_CREATED,
        format!("Created version {}", version.version_number),
        Some(json!({ "version_id": version.id, "version_number": version.version_number })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

/// Query parameters for `GET /templates/{id}/versions`.
#[derive(Debug, Deserialize, Default)]
pub struct ListVersionsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/templates/{id}/versions
///
/// Version history, newest first. Snapshots are omitted from the
/// listing; fetch a single version to get its snapshot.
pub async fn list_versions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Query(params): Query<ListVersionsQuery>,
) -> AppResult<Json<DataResponse<Vec<TemplateVersionSummary>>>> {
    guard::load_for_write(&state.pool, auth, template_id).await?;
    let versions = TemplateVersionRepo::list_for_template(
        &state.pool,
        template_id,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: versions }))
}

/// GET /api/v1/versions/{id}
///
/// A single version including its full snapshot. Access follows the
/// owning template's write rules.
pub async fn get_version(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(version_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TemplateVersion>>> {
    let version = TemplateVersionRepo::find_by_id(&state.pool, version_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Version",
            id: version_id,
        }))?;

    guard::load_for_write(&state.pool, auth, version.template_id).await?;
    Ok(Json(DataResponse { data: version }))
}

/// POST /api/v1/templates/{id}/rollback/{version_id}
///
/// Restore the template and its phases from a snapshot, atomically.
/// Current phases are replaced wholesale; branch targets are remapped
/// onto the restored rows.
pub async fn rollback_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((template_id, version_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Template>>> {
    let access = guard::load_for_write(&state.pool, auth, template_id).await?;

    let restored =
        TemplateVersionRepo::rollback(&state.pool, template_id, version_id, access.actor.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Version",
                id: version_id,
            }))?;

    tracing::info!(template_id, version_id, "Template rolled back");
    activity::record(
        &state.pool,
        template_id,
        access.actor.user_id,
        events::TEMPLATE_ROLLED_BACK,
        format!("Rolled back template '{}'", restored.name),
        Some(json!({ "version_id": version_id })),
    )
    .await;

    Ok(Json(DataResponse { data: restored }))
}
