//! Repository for the `template_versions` table, plus the transactional
//! publish and rollback sequences that span templates and phases.

use sqlx::{PgPool, Postgres, Transaction};

use pathways_core::snapshot::{
    branch_id_to_index, branch_index_to_id, PhaseSnapshot, TemplateSnapshot, VersionSnapshot,
};
use pathways_core::template::TemplateStatus;
use pathways_core::types::DbId;

use crate::models::phase::Phase;
use crate::models::template::Template;
use crate::models::template_version::{TemplateVersion, TemplateVersionSummary};
use crate::repositories::phase_repo::PHASE_COLUMNS;

/// Column list for template_versions queries.
const COLUMNS: &str = "id, template_id, version_number, snapshot, created_by, created_at";

/// Column list for version listings (snapshot payload omitted).
const SUMMARY_COLUMNS: &str = "id, template_id, version_number, created_by, created_at";

/// Column list for pathway_templates rows read inside version transactions.
const TEMPLATE_COLUMNS: &str = "id, creator_id, name, description, is_private, status, \
    visible_to_applicants, tags, applicant_instructions, manager_instructions, \
    last_updated_by, created_at, updated_at";

/// Provides snapshot, publish, and rollback operations for template
/// versions. Version rows are append-only.
pub struct TemplateVersionRepo;

impl TemplateVersionRepo {
    /// Snapshot a template and its phases into a new version row.
    ///
    /// The version number is `MAX(version_number) + 1` for the
    /// template, computed inside the same transaction as the insert so
    /// numbers are never skipped or reused. Returns `None` if the
    /// template does not exist.
    pub async fn create(
        pool: &PgPool,
        template_id: DbId,
        created_by: DbId,
    ) -> Result<Option<TemplateVersion>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(version) = snapshot_in_tx(&mut tx, template_id, created_by).await? else {
            return Ok(None);
        };
        tx.commit().await?;
        Ok(Some(version))
    }

    /// Find a version by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TemplateVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM template_versions WHERE id = $1");
        sqlx::query_as::<_, TemplateVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List version metadata for a template, newest first.
    pub async fn list_for_template(
        pool: &PgPool,
        template_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TemplateVersionSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM template_versions
             WHERE template_id = $1
             ORDER BY version_number DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, TemplateVersionSummary>(&query)
            .bind(template_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Publish a template: set its status to `published` and snapshot it
    /// as a new version, atomically.
    ///
    /// Either both writes commit or neither does, so a published
    /// template can never be missing its publication snapshot. Returns
    /// `None` if the template does not exist.
    pub async fn publish(
        pool: &PgPool,
        template_id: DbId,
        updated_by: DbId,
    ) -> Result<Option<(Template, TemplateVersion)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_status = format!(
            "UPDATE pathway_templates
             SET status = $2, last_updated_by = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {TEMPLATE_COLUMNS}"
        );
        let Some(template) = sqlx::query_as::<_, Template>(&update_status)
            .bind(template_id)
            .bind(TemplateStatus::Published.as_str())
            .bind(updated_by)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let Some(version) = snapshot_in_tx(&mut tx, template_id, updated_by).await? else {
            return Ok(None);
        };

        tx.commit().await?;
        Ok(Some((template, version)))
    }

    /// Roll a template back to the state captured in one of its
    /// versions.
    ///
    /// Restores the template's mutable fields, replaces the full phase
    /// set with fresh rows built from the snapshot, and remaps branch
    /// targets onto the new ids, all in one transaction. Returns `None`
    /// if the version does not exist or does not belong to the
    /// template.
    pub async fn rollback(
        pool: &PgPool,
        template_id: DbId,
        version_id: DbId,
        updated_by: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select_version = format!("SELECT {COLUMNS} FROM template_versions WHERE id = $1");
        let Some(version) = sqlx::query_as::<_, TemplateVersion>(&select_version)
            .bind(version_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };
        if version.template_id != template_id {
            return Ok(None);
        }

        let snapshot: VersionSnapshot = serde_json::from_value(version.snapshot)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        let restore_template = format!(
            "UPDATE pathway_templates SET
                name = $2,
                description = $3,
                is_private = $4,
                status = $5,
                visible_to_applicants = $6,
                tags = $7,
                applicant_instructions = $8,
                manager_instructions = $9,
                last_updated_by = $10,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {TEMPLATE_COLUMNS}"
        );
        let Some(template) = sqlx::query_as::<_, Template>(&restore_template)
            .bind(template_id)
            .bind(&snapshot.template.name)
            .bind(&snapshot.template.description)
            .bind(snapshot.template.is_private)
            .bind(&snapshot.template.status)
            .bind(snapshot.template.visible_to_applicants)
            .bind(&snapshot.template.tags)
            .bind(&snapshot.template.applicant_instructions)
            .bind(&snapshot.template.manager_instructions)
            .bind(updated_by)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM template_phases WHERE template_id = $1")
            .bind(template_id)
            .execute(&mut *tx)
            .await?;

        // Re-insert snapshot phases as fresh rows, then wire branch
        // targets once every row has an id.
        let mut new_ids: Vec<DbId> = Vec::with_capacity(snapshot.phases.len());
        for phase in &snapshot.phases {
            let new_id: (DbId,) = sqlx::query_as(
                "INSERT INTO template_phases
                    (template_id, name, phase_type, order_index, description, config,
                     starts_at, ends_at, applicant_instructions, manager_instructions,
                     is_visible_to_applicants)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                 RETURNING id",
            )
            .bind(template_id)
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

        for (position, phase) in snapshot.phases.iter().enumerate() {
            let success = branch_index_to_id(&new_ids, phase.branch_success_index);
            let failure = branch_index_to_id(&new_ids, phase.branch_failure_index);
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
        Ok(Some(template))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Read the template and its phases inside `tx`, freeze them into a
/// snapshot document, and insert the version row.
async fn snapshot_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    template_id: DbId,
    created_by: DbId,
) -> Result<Option<TemplateVersion>, sqlx::Error> {
    let select_template = format!("SELECT {TEMPLATE_COLUMNS} FROM pathway_templates WHERE id = $1");
    let Some(template) = sqlx::query_as::<_, Template>(&select_template)
        .bind(template_id)
        .fetch_optional(&mut **tx)
        .await?
    else {
        return Ok(None);
    };

    let select_phases = format!(
        "SELECT {PHASE_COLUMNS} FROM template_phases
         WHERE template_id = $1 ORDER BY order_index ASC"
    );
    let phases = sqlx::query_as::<_, Phase>(&select_phases)
        .bind(template_id)
        .fetch_all(&mut **tx)
        .await?;

    let snapshot = build_snapshot(&template, &phases);
    let snapshot_json =
        serde_json::to_value(&snapshot).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    let insert = format!(
        "INSERT INTO template_versions (template_id, version_number, snapshot, created_by)
         VALUES (
             $1,
             COALESCE(
                 (SELECT MAX(version_number) FROM template_versions WHERE template_id = $1),
                 0
             ) + 1,
             $2, $3
         )
         RETURNING {COLUMNS}"
    );
    let version = sqlx::query_as::<_, TemplateVersion>(&insert)
        .bind(template_id)
        .bind(&snapshot_json)
        .bind(created_by)
        .fetch_one(&mut **tx)
        .await?;

    Ok(Some(version))
}

/// Freeze a template row and its ordered phase rows into the snapshot
/// document. Branch targets are translated from raw row ids to
/// positions in the phase list so rollback can remap them.
fn build_snapshot(template: &Template, phases: &[Phase]) -> VersionSnapshot {
    let ordered_ids: Vec<DbId> = phases.iter().map(|p| p.id).collect();

    let phase_snapshots = phases
        .iter()
        .map(|p| PhaseSnapshot {
            name: p.name.clone(),
            phase_type: p.phase_type.clone(),
            order_index: p.order_index,
            description: p.description.clone(),
            config: p.config.clone(),
            starts_at: p.starts_at,
            ends_at: p.ends_at,
            applicant_instructions: p.applicant_instructions.clone(),
            manager_instructions: p.manager_instructions.clone(),
            is_visible_to_applicants: p.is_visible_to_applicants,
            branch_success_index: branch_id_to_index(&ordered_ids, p.branch_success_phase_id),
            branch_failure_index: branch_id_to_index(&ordered_ids, p.branch_failure_phase_id),
        })
        .collect();

    VersionSnapshot {
        template: TemplateSnapshot {
            name: template.name.clone(),
            description: template.description.clone(),
            is_private: template.is_private,
            status: template.status.clone(),
            visible_to_applicants: template.visible_to_applicants,
            tags: template.tags.clone(),
            applicant_instructions: template.applicant_instructions.clone(),
            manager_instructions: template.manager_instructions.clone(),
        },
        phases: phase_snapshots,
    }
}
