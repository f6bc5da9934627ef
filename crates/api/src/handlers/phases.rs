//! Handlers for template phases: the ordered, typed steps of a
//! template, including branching and reordering.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use pathways_core::error::CoreError;
use pathways_core::ordering::validate_reorder;
use pathways_core::phase::{
    validate_branch_targets, validate_date_window, validate_order_index, validate_phase_name,
    BranchTargets, PhaseType,
};
use pathways_core::types::DbId;
use pathways_db::models::phase::{
    CreatePhase, Phase, ReorderRequest, UpdateBranchingRequest, UpdatePhase,
};
use pathways_db::repositories::PhaseRepo;

use crate::activity::{self, events};
use crate::error::{AppError, AppResult};
use crate::guard::{self, TemplateAccess};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/templates/{id}/phases
///
/// All phases of a template, ordered by `order_index`.
pub async fn list_phases(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Phase>>>> {
    guard::load_for_read(&state.pool, auth, template_id).await?;
    let phases = PhaseRepo::list_by_template(&state.pool, template_id).await?;
    Ok(Json(DataResponse { data: phases }))
}

/// POST /api/v1/templates/{id}/phases
///
/// Add a phase. The order index must land within `0..=count`; siblings
/// at or past it shift up to keep the ordering contiguous.
pub async fn create_phase(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(input): Json<CreatePhase>,
) -> AppResult<(StatusCode, Json<DataResponse<Phase>>)> {
    let access = guard::load_for_write(&state.pool, auth, template_id).await?;

    PhaseType::parse(&input.phase_type).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_phase_name(&input.name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_date_window(input.starts_at, input.ends_at)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let phase_count = PhaseRepo::count_for_template(&state.pool, template_id).await?;
    validate_order_index(input.order_index, phase_count)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let phase = PhaseRepo::create(&state.pool, template_id, &input).await?;

    activity::record(
        &state.pool,
        template_id,
        access.actor.user_id,
        events::PHASE_CREATED,
        format!("Added {} phase '{}'", phase.phase_type, phase.name),
        Some(json!({ "phase_id": phase.id, "order_index": phase.order_index })),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: phase })))
}

/// PUT /api/v1/phases/{id}
///
/// Patch a phase's mutable fields. The phase type and order index are
/// immutable here; reordering has its own endpoint.
pub async fn update_phase(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(phase_id): Path<DbId>,
    Json(input): Json<UpdatePhase>,
) -> AppResult<Json<DataResponse<Phase>>> {
    let (phase, access) = load_phase_for_write(&state, auth, phase_id).await?;

    // The type is fixed at creation; echoing the current value back is
    // fine, anything else is an attempted change.
    if let Some(requested) = &input.phase_type {
        if requested != &phase.phase_type {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Phase type cannot be changed (phase is '{}')",
                phase.phase_type
            ))));
        }
    }
    if let Some(name) = &input.name {
        validate_phase_name(name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    // Check the window the phase would end up with after the patch.
    validate_date_window(
        input.starts_at.or(phase.starts_at),
        input.ends_at.or(phase.ends_at),
    )
    .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let updated = PhaseRepo::update(&state.pool, phase_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Phase",
            id: phase_id,
        }))?;

    activity::record(
        &state.pool,
        phase.template_id,
        access.actor.user_id,
        events::PHASE_UPDATED,
        format!("Updated phase '{}'", updated.name),
        Some(json!({ "phase_id": phase_id })),
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/phases/{id}/branching
///
/// Set or clear a phase's success/failure branch targets. Only
/// decision and review phases may branch, and targets must be other
/// phases of the same template.
pub async fn update_branching(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(phase_id): Path<DbId>,
    Json(input): Json<UpdateBranchingRequest>,
) -> AppResult<Json<DataResponse<Phase>>> {
    let (phase, access) = load_phase_for_write(&state, auth, phase_id).await?;

    // The CHECK constraint keeps stored types valid, so a parse failure
    // here means a corrupted row.
    let phase_type = PhaseType::parse(&phase.phase_type)
        .map_err(|msg| AppError::InternalError(format!("Stored phase type invalid: {msg}")))?;

    let sibling_ids = PhaseRepo::sibling_ids(&state.pool, phase.template_id).await?;
    let targets = BranchTargets {
        success: input.success_phase_id,
        failure: input.failure_phase_id,
    };
    validate_branch_targets(phase_id, phase_type, targets, &sibling_ids)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let updated =
        PhaseRepo::update_branching(&state.pool, phase_id, targets.success, targets.failure)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Phase",
                id: phase_id,
            }))?;

    activity::record(
        &state.pool,
        phase.template_id,
        access.actor.user_id,
        events::PHASE_BRANCHING_UPDATED,
        format!("Updated branching for phase '{}'", updated.name),
        Some(json!({
            "phase_id": phase_id,
            "success_phase_id": targets.success,
            "failure_phase_id": targets.failure,
        })),
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/phases/{id}
///
/// Remove a phase. Sibling branch references to it are nulled and the
/// remaining order indexes compact back to `0..n-1`, atomically.
pub async fn delete_phase(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(phase_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (phase, access) = load_phase_for_write(&state, auth, phase_id).await?;

    let deleted = PhaseRepo::delete_with_compaction(&state.pool, phase_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Phase",
            id: phase_id,
        }));
    }

    activity::record(
        &state.pool,
        phase.template_id,
        access.actor.user_id,
        events::PHASE_DELETED,
        format!("Deleted phase '{}'", phase.name),
        Some(json!({ "phase_id": phase_id })),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/templates/{id}/phases/reorder
///
/// Apply a full reorder batch. The batch must cover every phase of the
/// template exactly once and assign indexes `0..n-1`; anything else is
/// rejected wholesale.
pub async fn reorder_phases(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<Phase>>>> {
    let access = guard::load_for_write(&state.pool, auth, template_id).await?;

    let sibling_ids = PhaseRepo::sibling_ids(&state.pool, template_id).await?;
    validate_reorder(&input.phases, &sibling_ids)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    PhaseRepo::reorder(&state.pool, template_id, &input.phases).await?;

    activity::record(
        &state.pool,
        template_id,
        access.actor.user_id,
        events::PHASES_REORDERED,
        format!("Reordered {} phases", input.phases.len()),
        None,
    )
    .await;

    let phases = PhaseRepo::list_by_template(&state.pool, template_id).await?;
    Ok(Json(DataResponse { data: phases }))
}

/// Load a phase and authorize write access on its owning template.
async fn load_phase_for_write(
    state: &AppState,
    auth: AuthUser,
    phase_id: DbId,
) -> AppResult<(Phase, TemplateAccess)> {
    let phase = PhaseRepo::find_by_id(&state.pool, phase_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Phase",
            id: phase_id,
        }))?;
    let access = guard::load_for_write(&state.pool, auth, phase.template_id).await?;
    Ok((phase, access))
}
