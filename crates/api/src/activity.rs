//! Activity log recording.
//!
//! The activity log is a fire-and-forget side channel: a failed insert
//! is logged and swallowed so it can never fail the primary operation.

use pathways_core::types::DbId;
use pathways_db::models::activity::RecordActivity;
use pathways_db::repositories::ActivityRepo;
use pathways_db::DbPool;

/// Well-known activity event types.
pub mod events {
    pub const TEMPLATE_CREATED: &str = "template_created";
    pub const TEMPLATE_UPDATED: &str = "template_updated";
    pub const TEMPLATE_DELETED: &str = "template_deleted";
    pub const TEMPLATE_STATUS_CHANGED: &str = "template_status_changed";
    pub const TEMPLATE_PUBLISHED: &str = "template_published";
    pub const TEMPLATE_CLONED: &str = "template_cloned";
    pub const TEMPLATE_ROLLED_BACK: &str = "template_rolled_back";
    pub const VERSION_CREATED: &str = "version_created";
    pub const PHASE_CREATED: &str = "phase_created";
    pub const PHASE_UPDATED: &str = "phase_updated";
    pub const PHASE_DELETED: &str = "phase_deleted";
    pub const PHASE_BRANCHING_UPDATED: &str = "phase_branching_updated";
    pub const PHASES_REORDERED: &str = "phases_reordered";
    pub const CAMPAIGN_INSTANTIATED: &str = "campaign_instantiated";
}

/// Record one activity entry, swallowing (but logging) any failure.
pub async fn record(
    pool: &DbPool,
    template_id: DbId,
    actor_id: DbId,
    event_type: &str,
    description: impl Into<String>,
    detail: Option<serde_json::Value>,
) {
    let input = RecordActivity {
        template_id,
        actor_id,
        event_type: event_type.to_string(),
        description: description.into(),
        detail,
    };

    if let Err(e) = ActivityRepo::record(pool, &input).await {
        tracing::warn!(
            error = %e,
            template_id,
            actor_id,
            event_type,
            "Failed to record activity entry"
        );
    }
}
