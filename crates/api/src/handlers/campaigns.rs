//! Handlers for campaigns: runnable instances deep-copied from
//! templates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use pathways_core::error::CoreError;
use pathways_core::types::DbId;
use pathways_db::models::campaign::{Campaign, CampaignPhase, CreateCampaign};
use pathways_db::repositories::CampaignRepo;

use crate::activity::{self, events};
use crate::error::{AppError, AppResult};
use crate::guard;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `POST /campaigns`: the campaign plus the phases
/// copied into it.
#[derive(Debug, Serialize)]
pub struct CampaignWithPhases {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub phases: Vec<CampaignPhase>,
}

/// POST /api/v1/campaigns
///
/// Create a campaign. With a `template_id`, the template's phases are
/// deep-copied into the campaign with provenance links; later template
/// edits never touch the copies.
pub async fn create_campaign(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<(StatusCode, Json<DataResponse<CampaignWithPhases>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Campaign name cannot be empty".into(),
        )));
    }

    // Instantiating from a template requires read access to it.
    if let Some(template_id) = input.template_id {
        guard::load_for_read(&state.pool, auth.clone(), template_id).await?;
    }

    let (campaign, phases) =
        CampaignRepo::create(&state.pool, input.name.trim(), input.template_id, auth.user_id)
            .await?;

    tracing::info!(campaign_id = campaign.id, user_id = auth.user_id, "Campaign created");
    if let Some(template_id) = campaign.template_id {
        activity::record(
            &state.pool,
            template_id,
            auth.user_id,
            events::CAMPAIGN_INSTANTIATED,
            format!("Instantiated campaign '{}'", campaign.name),
            Some(json!({ "campaign_id": campaign.id, "phase_count": phases.len() })),
        )
        .await;
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CampaignWithPhases { campaign, phases },
        }),
    ))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_campaign(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let campaign = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;
    Ok(Json(DataResponse { data: campaign }))
}

/// GET /api/v1/campaigns/{id}/phases
///
/// The campaign's own phase copies, ordered by `order_index`.
pub async fn list_campaign_phases(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CampaignPhase>>>> {
    let campaign = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;

    let phases = CampaignRepo::list_phases(&state.pool, campaign.id).await?;
    Ok(Json(DataResponse { data: phases }))
}
