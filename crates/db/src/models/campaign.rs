//! Campaign and campaign-phase models and DTOs.
//!
//! Campaign phases are independent once copied: they carry a
//! provenance pointer (`original_phase_id`) back to the template phase
//! they were copied from but no branch columns, since campaign phases
//! do not participate in template branching validation.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pathways_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A campaign row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Campaign {
    pub id: DbId,
    pub template_id: Option<DbId>,
    pub name: String,
    pub status: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A campaign phase row from the `campaign_phases` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CampaignPhase {
    pub id: DbId,
    pub campaign_id: DbId,
    pub original_phase_id: Option<DbId>,
    pub name: String,
    pub phase_type: String,
    pub order_index: i32,
    pub description: Option<String>,
    pub config: serde_json::Value,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub applicant_instructions: Option<String>,
    pub manager_instructions: Option<String>,
    pub is_visible_to_applicants: bool,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Request body for `POST /campaigns`.
///
/// When `template_id` is set the new campaign deep-copies that
/// template's phases with provenance links.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaign {
    pub name: String,
    pub template_id: Option<DbId>,
}
