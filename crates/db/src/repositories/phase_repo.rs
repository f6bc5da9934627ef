//! Repository for the `template_phases` table.

use sqlx::PgPool;

use pathways_core::ordering::{compact_after_removal, ReorderEntry};
use pathways_core::types::DbId;

use crate::models::phase::{CreatePhase, Phase, UpdatePhase};

/// Column list for template_phases queries. Shared with the clone path
/// in `template_repo`.
pub(crate) const PHASE_COLUMNS: &str = "id, template_id, name, phase_type, order_index, \
    description, config, starts_at, ends_at, applicant_instructions, \
    manager_instructions, is_visible_to_applicants, branch_success_phase_id, \
    branch_failure_phase_id, created_at, updated_at";

/// Provides CRUD and graph operations for template phases.
pub struct PhaseRepo;

impl PhaseRepo {
    /// Insert a new phase, returning the created row.
    ///
    /// Siblings at or past the requested index shift up by one so the
    /// template keeps a contiguous `0..n-1` ordering. Branch targets
    /// always start NULL; they are wired up through
    /// [`PhaseRepo::update_branching`]. Runs in one transaction.
    pub async fn create(
        pool: &PgPool,
        template_id: DbId,
        input: &CreatePhase,
    ) -> Result<Phase, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE template_phases
             SET order_index = order_index + 1, updated_at = NOW()
             WHERE template_id = $1 AND order_index >= $2",
        )
        .bind(template_id)
        .bind(input.order_index)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO template_phases
                (template_id, name, phase_type, order_index, description, config,
                 starts_at, ends_at, applicant_instructions, manager_instructions,
                 is_visible_to_applicants)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, '{{}}'::jsonb),
                     $7, $8, $9, $10, COALESCE($11, true))
             RETURNING {PHASE_COLUMNS}"
        );
        let phase = sqlx::query_as::<_, Phase>(&query)
            .bind(template_id)
            .bind(&input.name)
            .bind(&input.phase_type)
            .bind(input.order_index)
            .bind(&input.description)
            .bind(&input.config)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.applicant_instructions)
            .bind(&input.manager_instructions)
            .bind(input.is_visible_to_applicants)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(phase)
    }

    /// Find a phase by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Phase>, sqlx::Error> {
        let query = format!("SELECT {PHASE_COLUMNS} FROM template_phases WHERE id = $1");
        sqlx::query_as::<_, Phase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all phases of a template ordered by `order_index`.
    pub async fn list_by_template(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<Phase>, sqlx::Error> {
        let query = format!(
            "SELECT {PHASE_COLUMNS} FROM template_phases
             WHERE template_id = $1
             ORDER BY order_index ASC"
        );
        sqlx::query_as::<_, Phase>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// Count phases for a template.
    pub async fn count_for_template(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM template_phases WHERE template_id = $1")
                .bind(template_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Fetch the id set of a template's phases, ordered by `order_index`.
    pub async fn sibling_ids(pool: &PgPool, template_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT id FROM template_phases WHERE template_id = $1 ORDER BY order_index ASC",
        )
        .bind(template_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Patch a phase's mutable fields. The phase type and order index
    /// are not part of the patch surface. Returns `None` if the id does
    /// not resolve.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePhase,
    ) -> Result<Option<Phase>, sqlx::Error> {
        let query = format!(
            "UPDATE template_phases SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                config = COALESCE($4, config),
                starts_at = COALESCE($5, starts_at),
                ends_at = COALESCE($6, ends_at),
                applicant_instructions = COALESCE($7, applicant_instructions),
                manager_instructions = COALESCE($8, manager_instructions),
                is_visible_to_applicants = COALESCE($9, is_visible_to_applicants),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PHASE_COLUMNS}"
        );
        sqlx::query_as::<_, Phase>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.config)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.applicant_instructions)
            .bind(&input.manager_instructions)
            .bind(input.is_visible_to_applicants)
            .fetch_optional(pool)
            .await
    }

    /// Set both branch target columns. Target validity is the caller's
    /// responsibility (validated in `pathways_core::phase`).
    pub async fn update_branching(
        pool: &PgPool,
        id: DbId,
        success_phase_id: Option<DbId>,
        failure_phase_id: Option<DbId>,
    ) -> Result<Option<Phase>, sqlx::Error> {
        let query = format!(
            "UPDATE template_phases
             SET branch_success_phase_id = $2,
                 branch_failure_phase_id = $3,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {PHASE_COLUMNS}"
        );
        sqlx::query_as::<_, Phase>(&query)
            .bind(id)
            .bind(success_phase_id)
            .bind(failure_phase_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a validated reorder batch in one transaction.
    ///
    /// The batch must already satisfy the permutation invariant
    /// (`pathways_core::ordering::validate_reorder`); this method only
    /// writes the indexes.
    pub async fn reorder(
        pool: &PgPool,
        template_id: DbId,
        entries: &[ReorderEntry],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for entry in entries {
            sqlx::query(
                "UPDATE template_phases
                 SET order_index = $3, updated_at = NOW()
                 WHERE id = $1 AND template_id = $2",
            )
            .bind(entry.id)
            .bind(template_id)
            .bind(entry.order_index)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Hard-delete a phase, nulling any sibling branch reference to it
    /// and compacting the remaining order indexes back to `0..n-1`.
    /// Runs in one transaction. Returns `false` if the id does not
    /// resolve.
    pub async fn delete_with_compaction(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some((template_id,)): Option<(DbId,)> =
            sqlx::query_as("SELECT template_id FROM template_phases WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Ok(false);
        };

        // Null out dangling branch references before the row goes away.
        sqlx::query(
            "UPDATE template_phases
             SET branch_success_phase_id = NULL
             WHERE template_id = $1 AND branch_success_phase_id = $2",
        )
        .bind(template_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE template_phases
             SET branch_failure_phase_id = NULL
             WHERE template_id = $1 AND branch_failure_phase_id = $2",
        )
        .bind(template_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let ordered: Vec<(DbId,)> = sqlx::query_as(
            "SELECT id FROM template_phases WHERE template_id = $1 ORDER BY order_index ASC",
        )
        .bind(template_id)
        .fetch_all(&mut *tx)
        .await?;
        let ordered_ids: Vec<DbId> = ordered.into_iter().map(|r| r.0).collect();

        sqlx::query("DELETE FROM template_phases WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for (sibling_id, new_index) in compact_after_removal(&ordered_ids, id) {
            sqlx::query(
                "UPDATE template_phases SET order_index = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(sibling_id)
            .bind(new_index)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}
