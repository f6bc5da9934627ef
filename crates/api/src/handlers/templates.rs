//! Handlers for the `/templates` resource: CRUD, lifecycle status,
//! publishing, cloning, and the activity feed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use pathways_core::error::CoreError;
use pathways_core::template::{
    validate_description, validate_name, validate_tags, validate_transition, TemplateStatus,
};
use pathways_core::types::DbId;
use pathways_db::models::activity::ActivityEntry;
use pathways_db::models::template::{
    CloneTemplateRequest, CreateTemplate, Template, UpdateStatusRequest, UpdateTemplate,
};
use pathways_db::repositories::{ActivityRepo, TemplateFilter, TemplateRepo, TemplateVersionRepo};

use crate::activity::{self, events};
use crate::error::{AppError, AppResult};
use crate::guard;
use crate::middleware::auth::AuthUser;
use crate::query::{clamp_limit, clamp_offset};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /templates`.
#[derive(Debug, Deserialize, Default)]
pub struct ListTemplatesQuery {
    pub status: Option<String>,
    pub tag: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/templates
///
/// List templates visible to the caller: their own, plus public
/// published ones. Admins see everything.
pub async fn list_templates(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListTemplatesQuery>,
) -> AppResult<Json<DataResponse<Vec<Template>>>> {
    let status = match params.status {
        Some(raw) => {
            let parsed = TemplateStatus::parse(&raw)
                .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
            Some(parsed.as_str().to_string())
        }
        None => None,
    };

    let filter = TemplateFilter {
        status,
        tag: params.tag,
        limit: clamp_limit(params.limit),
        offset: clamp_offset(params.offset),
    };

    let templates =
        TemplateRepo::list_visible(&state.pool, auth.user_id, auth.is_admin(), &filter).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/templates
///
/// Create a template in `draft` status, owned by the caller.
pub async fn create_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<Template>>)> {
    validate_name(&input.name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if let Some(description) = &input.description {
        validate_description(description)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if let Some(tags) = &input.tags {
        validate_tags(tags).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let template = TemplateRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(template_id = template.id, user_id = auth.user_id, "Template created");
    activity::record(
        &state.pool,
        template.id,
        auth.user_id,
        events::TEMPLATE_CREATED,
        format!("Created template '{}'", template.name),
        None,
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/templates/{id}
pub async fn get_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Template>>> {
    let access = guard::load_for_read(&state.pool, auth, template_id).await?;
    Ok(Json(DataResponse {
        data: access.template,
    }))
}

/// PUT /api/v1/templates/{id}
///
/// Patch metadata fields. Lifecycle status is not patchable here; use
/// the status endpoint.
pub async fn update_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<Json<DataResponse<Template>>> {
    let access = guard::load_for_write(&state.pool, auth, template_id).await?;

    if let Some(name) = &input.name {
        validate_name(name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if let Some(description) = &input.description {
        validate_description(description)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if let Some(tags) = &input.tags {
        validate_tags(tags).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let updated = TemplateRepo::update(&state.pool, template_id, &input, access.actor.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: template_id,
        }))?;

    activity::record(
        &state.pool,
        template_id,
        access.actor.user_id,
        events::TEMPLATE_UPDATED,
        format!("Updated template '{}'", updated.name),
        None,
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/templates/{id}
///
/// Hard-delete a template and everything hanging off it (phases,
/// versions, activity).
pub async fn delete_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let access = guard::load_for_write(&state.pool, auth, template_id).await?;

    let deleted = TemplateRepo::delete(&state.pool, template_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: template_id,
        }));
    }

    // No activity entry: the log rows cascade away with the template.
    tracing::info!(
        template_id,
        user_id = access.actor.user_id,
        name = %access.template.name,
        "Template deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/templates/{id}/status
///
/// Move the template through its lifecycle. `published` is reserved
/// for the publish endpoint, which also snapshots a version.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Template>>> {
    let access = guard::load_for_write(&state.pool, auth, template_id).await?;

    let next = validate_transition(&access.template.status, &input.status)
        .map_err(|msg| AppError::Core(CoreError::Conflict(msg)))?;
    if next == TemplateStatus::Published {
        return Err(AppError::Core(CoreError::Validation(
            "Use the publish endpoint to publish a template".into(),
        )));
    }

    let updated = TemplateRepo::set_status(&state.pool, template_id, next, access.actor.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: template_id,
        }))?;

    activity::record(
        &state.pool,
        template_id,
        access.actor.user_id,
        events::TEMPLATE_STATUS_CHANGED,
        format!(
            "Status changed from '{}' to '{}'",
            access.template.status, updated.status
        ),
        Some(json!({ "from": access.template.status, "to": updated.status })),
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/templates/{id}/publish
///
/// Publish the template and snapshot it as a new immutable version,
/// atomically.
pub async fn publish_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Template>>> {
    let access = guard::load_for_write(&state.pool, auth, template_id).await?;

    validate_transition(&access.template.status, TemplateStatus::Published.as_str())
        .map_err(|msg| AppError::Core(CoreError::Conflict(msg)))?;

    let (template, version) =
        TemplateVersionRepo::publish(&state.pool, template_id, access.actor.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Template",
                id: template_id,
            }))?;

    tracing::info!(
        template_id,
        version_number = version.version_number,
        "Template published"
    );
    activity::record(
        &state.pool,
        template_id,
        access.actor.user_id,
        events::TEMPLATE_PUBLISHED,
        format!(
            "Published template '{}' as version {}",
            template.name, version.version_number
        ),
        Some(json!({ "version_id": version.id, "version_number": version.version_number })),
    )
    .await;

    Ok(Json(DataResponse { data: template }))
}

/// POST /api/v1/templates/{id}/clone
///
/// Copy a template and its phases into a fresh `draft` owned by the
/// caller. The copy is fully independent of the source.
pub async fn clone_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(input): Json<CloneTemplateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Template>>)> {
    let access = guard::load_for_read(&state.pool, auth, template_id).await?;
    validate_name(&input.name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let clone =
        TemplateRepo::clone_with_phases(&state.pool, template_id, &input.name, access.actor.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Template",
                id: template_id,
            }))?;

    activity::record(
        &state.pool,
        template_id,
        access.actor.user_id,
        events::TEMPLATE_CLONED,
        format!("Cloned into new template '{}'", clone.name),
        Some(json!({ "clone_id": clone.id })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: clone })))
}

/// Query parameters for `GET /templates/{id}/activity`.
#[derive(Debug, Deserialize, Default)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/templates/{id}/activity
///
/// The template's change history, newest first. Restricted to the
/// creator and admins.
pub async fn list_activity(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<DataResponse<Vec<ActivityEntry>>>> {
    guard::load_for_write(&state.pool, auth, template_id).await?;

    let entries = ActivityRepo::list_for_template(
        &state.pool,
        template_id,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;

    Ok(Json(DataResponse { data: entries }))
}
