//! Pathway template models and DTOs.
//!
//! Defines the database row struct for `pathway_templates` and the
//! create/update types used by the API layer.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pathways_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A template row from the `pathway_templates` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Template {
    pub id: DbId,
    pub creator_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub status: String,
    pub visible_to_applicants: bool,
    pub tags: Vec<String>,
    pub applicant_instructions: Option<String>,
    pub manager_instructions: Option<String>,
    pub last_updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Request body / repository input for creating a template.
///
/// New templates always start in `draft`; status is not part of the
/// create surface.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub description: Option<String>,
    pub is_private: Option<bool>,
    pub visible_to_applicants: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub applicant_instructions: Option<String>,
    pub manager_instructions: Option<String>,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Input for patching an existing template. Status changes go through
/// the dedicated status/publish operations, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
    pub visible_to_applicants: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub applicant_instructions: Option<String>,
    pub manager_instructions: Option<String>,
}

// ---------------------------------------------------------------------------
// API request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /templates/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request body for `POST /templates/{id}/clone`.
#[derive(Debug, Clone, Deserialize)]
pub struct CloneTemplateRequest {
    pub name: String,
}
