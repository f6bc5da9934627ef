//! Template version models and DTOs.
//!
//! Version rows are append-only; there is no update DTO by design.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pathways_core::types::{DbId, Timestamp};

/// A version row from the `template_versions` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TemplateVersion {
    pub id: DbId,
    pub template_id: DbId,
    pub version_number: i32,
    pub snapshot: serde_json::Value,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// Slim listing row: version metadata without the snapshot payload.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateVersionSummary {
    pub id: DbId,
    pub template_id: DbId,
    pub version_number: i32,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}
