//! Repository for the `campaigns` and `campaign_phases` tables.

use sqlx::{PgPool, Postgres, Transaction};

use pathways_core::types::DbId;

use crate::models::campaign::{Campaign, CampaignPhase};
use crate::repositories::phase_repo::PHASE_COLUMNS;

/// Column list for campaigns queries.
const COLUMNS: &str = "id, template_id, name, status, created_by, created_at, updated_at";

/// Column list for campaign_phases queries.
const CAMPAIGN_PHASE_COLUMNS: &str = "id, campaign_id, original_phase_id, name, phase_type, \
    order_index, description, config, starts_at, ends_at, applicant_instructions, \
    manager_instructions, is_visible_to_applicants, created_at";

/// Provides CRUD operations for campaigns and their deep-copied phases.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Create a campaign, deep-copying the phases of `template_id` when
    /// one is given.
    ///
    /// Every copied phase records the template phase it came from in
    /// `original_phase_id`. A template with zero phases produces a
    /// campaign with zero phases rather than an error. Runs in one
    /// transaction.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        template_id: Option<DbId>,
        created_by: DbId,
    ) -> Result<(Campaign, Vec<CampaignPhase>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert = format!(
            "INSERT INTO campaigns (template_id, name, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let campaign = sqlx::query_as::<_, Campaign>(&insert)
            .bind(template_id)
            .bind(name)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        let phases = match template_id {
            Some(template_id) => {
                deep_copy_phases_in_tx(&mut tx, campaign.id, template_id).await?
            }
            None => Vec::new(),
        };

        tx.commit().await?;
        Ok((campaign, phases))
    }

    /// Find a campaign by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's phases ordered by `order_index`.
    pub async fn list_phases(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<CampaignPhase>, sqlx::Error> {
        let query = format!(
            "SELECT {CAMPAIGN_PHASE_COLUMNS} FROM campaign_phases
             WHERE campaign_id = $1
             ORDER BY order_index ASC"
        );
        sqlx::query_as::<_, CampaignPhase>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }
}

/// Copy every phase of `template_id` into `campaign_id`, preserving
/// order, type, config, and instructional fields, and stamping each
/// copy with the source phase id.
async fn deep_copy_phases_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    campaign_id: DbId,
    template_id: DbId,
) -> Result<Vec<CampaignPhase>, sqlx::Error> {
    let select_phases = format!(
        "SELECT {PHASE_COLUMNS} FROM template_phases
         WHERE template_id = $1 ORDER BY order_index ASC"
    );
    let source_phases = sqlx::query_as::<_, crate::models::phase::Phase>(&select_phases)
        .bind(template_id)
        .fetch_all(&mut **tx)
        .await?;

    let insert = format!(
        "INSERT INTO campaign_phases
            (campaign_id, original_phase_id, name, phase_type, order_index,
             description, config, starts_at, ends_at, applicant_instructions,
             manager_instructions, is_visible_to_applicants)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
         RETURNING {CAMPAIGN_PHASE_COLUMNS}"
    );

    let mut copies = Vec::with_capacity(source_phases.len());
    for phase in &source_phases {
        let copy = sqlx::query_as::<_, CampaignPhase>(&insert)
            .bind(campaign_id)
            .bind(phase.id)
            .bind(&phase.name)
            .bind(&phase.phase_type)
            .bind(phase.order_index)
            .bind(&phase.description)
            .bind(&phase.config)
            .bind(phase.starts_at)
            .bind(phase.ends_at)
            .bind(&phase.applicant_instructions)
            .bind(&phase.manager_instructions)
            .bind(phase.is_visible_to_applicants)
            .fetch_one(&mut **tx)
            .await?;
        copies.push(copy);
    }

    Ok(copies)
}
