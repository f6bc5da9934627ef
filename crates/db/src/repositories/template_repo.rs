//! Repository for the `pathway_templates` table.

use sqlx::PgPool;

use pathways_core::snapshot::{branch_id_to_index, branch_index_to_id};
use pathways_core::template::TemplateStatus;
use pathways_core::types::DbId;

use crate::models::template::{CreateTemplate, Template, UpdateTemplate};
use crate::repositories::phase_repo::PHASE_COLUMNS;

/// Column list for pathway_templates queries.
const COLUMNS: &str = "id, creator_id, name, description, is_private, status, \
    visible_to_applicants, tags, applicant_instructions, manager_instructions, \
    last_updated_by, created_at, updated_at";

/// Filter parameters for template listing.
#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
    pub status: Option<String>,
    pub tag: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Provides CRUD operations for pathway templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template in `draft` status, returning the created row.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        input: &CreateTemplate,
    ) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO pathway_templates
                (creator_id, name, description, is_private, visible_to_applicants,
                 tags, applicant_instructions, manager_instructions)
             VALUES ($1, $2, $3, COALESCE($4, true), COALESCE($5, false),
                     COALESCE($6, '{{}}'), $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(creator_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_private)
            .bind(input.visible_to_applicants)
            .bind(&input.tags)
            .bind(&input.applicant_instructions)
            .bind(&input.manager_instructions)
            .fetch_one(pool)
            .await
    }

    /// Find a template by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pathway_templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List templates visible to the given viewer.
    ///
    /// Admins see everything; other principals see their own templates
    /// plus public published ones. Optional status and tag filters
    /// narrow the result further.
    pub async fn list_visible(
        pool: &PgPool,
        viewer_id: DbId,
        is_admin: bool,
        filter: &TemplateFilter,
    ) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pathway_templates
             WHERE ($2 OR creator_id = $1 OR (NOT is_private AND status = 'published'))
               AND ($3::TEXT IS NULL OR status = $3)
               AND ($4::TEXT IS NULL OR $4 = ANY(tags))
             ORDER BY updated_at DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(viewer_id)
            .bind(is_admin)
            .bind(&filter.status)
            .bind(&filter.tag)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Patch a template's mutable fields. Returns `None` if the id does
    /// not resolve.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTemplate,
        updated_by: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE pathway_templates SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_private = COALESCE($4, is_private),
                visible_to_applicants = COALESCE($5, visible_to_applicants),
                tags = COALESCE($6, tags),
                applicant_instructions = COALESCE($7, applicant_instructions),
                manager_instructions = COALESCE($8, manager_instructions),
                last_updated_by = $9,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_private)
            .bind(input.visible_to_applicants)
            .bind(&input.tags)
            .bind(&input.applicant_instructions)
            .bind(&input.manager_instructions)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Set a template's lifecycle status. Transition legality is the
    /// caller's responsibility (validated in `pathways_core::template`).
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: TemplateStatus,
        updated_by: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE pathway_templates
             SET status = $2, last_updated_by = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a template. Phases, versions, and activity cascade.
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pathway_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clone a template and all of its phases into a fresh, independent
    /// `draft` template owned by `actor_id`.
    ///
    /// Phase copies preserve order, type, config, and instructional
    /// fields but get new ids and carry no provenance link back to the
    /// source. Branch targets are remapped onto the freshly inserted
    /// rows. Runs in one transaction.
    pub async fn clone_with_phases(
        pool: &PgPool,
        source_id: DbId,
        new_name: &str,
        actor_id: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select_source = format!("SELECT {COLUMNS} FROM pathway_templates WHERE id = $1");
        let Some(source) = sqlx::query_as::<_, Template>(&select_source)
            .bind(source_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let insert_template = format!(
            "INSERT INTO pathway_templates
                (creator_id, name, description, is_private, visible_to_applicants,
                 tags, applicant_instructions, manager_instructions)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let clone = sqlx::query_as::<_, Template>(&insert_template)
            .bind(actor_id)
            .bind(new_name)
            .bind(&source.description)
            .bind(source.is_private)
            .bind(source.visible_to_applicants)
            .bind(&source.tags)
            .bind(&source.applicant_instructions)
            .bind(&source.manager_instructions)
            .fetch_one(&mut *tx)
            .await?;

        // Copy phases in order. Branch targets are inserted NULL first
        // and wired up once every copy has an id.
        let select_phases = format!(
            "SELECT {PHASE_COLUMNS} FROM template_phases
             WHERE template_id = $1 ORDER BY order_index ASC"
        );
        let source_phases =
            sqlx::query_as::<_, crate::models::phase::Phase>(&select_phases)
                .bind(source_id)
                .fetch_all(&mut *tx)
                .await?;

        let mut new_ids: Vec<DbId> = Vec::with_capacity(source_phases.len());
        for phase in &source_phases {
            let new_id: (DbId,) = sqlx::query_as(
                "INSERT INTO template_phases
                    (template_id, name, phase_type, order_index, description, config,
                     starts_at, ends_at, applicant_instructions, manager_instructions,
                     is_visible_to_applicants)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                 RETURNING id",
            )
            .bind(clone.id)
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
            .fetch_one(&mut *tx)
            .await?;
            new_ids.push(new_id.0);
        }

        let old_ids: Vec<DbId> = source_phases.iter().map(|p| p.id).collect();
        for (position, phase) in source_phases.iter().enumerate() {
            let success = branch_index_to_id(
                &new_ids,
                branch_id_to_index(&old_ids, phase.branch_success_phase_id),
            );
            let failure = branch_index_to_id(
                &new_ids,
                branch_id_to_index(&old_ids, phase.branch_failure_phase_id),
            );
            if success.is_some() || failure.is_some() {
                sqlx::query(
                    "UPDATE template_phases
                     SET branch_success_phase_id = $2, branch_failure_phase_id = $3
                     WHERE id = $1",
                )
                .bind(new_ids[position])
                .bind(success)
                .bind(failure)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(clone))
    }
}
