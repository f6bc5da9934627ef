//! Template activity log models.

use serde::Serialize;
use sqlx::FromRow;

use pathways_core::types::{DbId, Timestamp};

/// An activity row from the `template_activity` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityEntry {
    pub id: DbId,
    pub template_id: DbId,
    pub actor_id: DbId,
    pub event_type: String,
    pub description: String,
    pub detail: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// Input for recording an activity entry.
#[derive(Debug, Clone)]
pub struct RecordActivity {
    pub template_id: DbId,
    pub actor_id: DbId,
    pub event_type: String,
    pub description: String,
    pub detail: Option<serde_json::Value>,
}
