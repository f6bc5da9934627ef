//! Template phase models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pathways_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A phase row from the `template_phases` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Phase {
    pub id: DbId,
    pub template_id: DbId,
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
    pub branch_success_phase_id: Option<DbId>,
    pub branch_failure_phase_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Request body / repository input for creating a phase.
///
/// Branch targets are never set at creation; they are wired up through
/// the dedicated branching operation once both endpoints exist.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhase {
    pub name: String,
    pub phase_type: String,
    pub order_index: i32,
    pub description: Option<String>,
    pub config: Option<serde_json::Value>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub applicant_instructions: Option<String>,
    pub manager_instructions: Option<String>,
    pub is_visible_to_applicants: Option<bool>,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Input for patching an existing phase.
///
/// A phase's type is immutable after creation. `phase_type` is still
/// accepted here so the handler can reject an attempted change
/// explicitly instead of ignoring it; the repository never writes it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePhase {
    pub name: Option<String>,
    pub phase_type: Option<String>,
    pub description: Option<String>,
    pub config: Option<serde_json::Value>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub applicant_instructions: Option<String>,
    pub manager_instructions: Option<String>,
    pub is_visible_to_applicants: Option<bool>,
}

// ---------------------------------------------------------------------------
// API request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /phases/{id}/branching`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBranchingRequest {
    pub success_phase_id: Option<DbId>,
    pub failure_phase_id: Option<DbId>,
}

/// Request body for `PUT /templates/{id}/phases/reorder`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub phases: Vec<pathways_core::ordering::ReorderEntry>,
}
