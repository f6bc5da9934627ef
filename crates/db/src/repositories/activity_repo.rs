//! Repository for the `template_activity` table. Append-only.

use sqlx::PgPool;

use pathways_core::types::DbId;

use crate::models::activity::{ActivityEntry, RecordActivity};

/// Column list for template_activity queries.
const COLUMNS: &str = "id, template_id, actor_id, event_type, description, detail, created_at";

/// Provides insert and query operations for the activity log.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Append one activity entry.
    pub async fn record(
        pool: &PgPool,
        input: &RecordActivity,
    ) -> Result<ActivityEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO template_activity
                (template_id, actor_id, event_type, description, detail)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(input.template_id)
            .bind(input.actor_id)
            .bind(&input.event_type)
            .bind(&input.description)
            .bind(&input.detail)
            .fetch_one(pool)
            .await
    }

    /// List activity for a template, newest first.
    pub async fn list_for_template(
        pool: &PgPool,
        template_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM template_activity
             WHERE template_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(template_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
