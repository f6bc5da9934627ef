//! Version snapshot format and branch-target remapping.
//!
//! A template version freezes the template's mutable fields plus its
//! full ordered phase list as a single JSON document. Branch targets
//! inside a snapshot are stored as *order indexes into the snapshot's
//! phase list* rather than raw row ids: rollback re-inserts phases as
//! fresh rows, so raw ids captured at snapshot time would dangle.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Snapshot document
// ---------------------------------------------------------------------------

/// The frozen template fields captured in a version snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSnapshot {
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub status: String,
    pub visible_to_applicants: bool,
    pub tags: Vec<String>,
    pub applicant_instructions: Option<String>,
    pub manager_instructions: Option<String>,
}

/// One frozen phase inside a version snapshot.
///
/// `branch_success_index` / `branch_failure_index` point at positions
/// in [`VersionSnapshot::phases`] (which is ordered by `order_index`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseSnapshot {
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
    pub branch_success_index: Option<usize>,
    pub branch_failure_index: Option<usize>,
}

/// The full snapshot document stored in `template_versions.snapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSnapshot {
    pub template: TemplateSnapshot,
    pub phases: Vec<PhaseSnapshot>,
}

// ---------------------------------------------------------------------------
// Branch index mapping
// ---------------------------------------------------------------------------

/// Map raw branch-target ids to snapshot phase-list indexes.
///
/// `ordered_ids` is the template's phase ids sorted by `order_index`
/// (the same order the snapshot phase list uses). A dangling target id
/// maps to `None` rather than failing; snapshots tolerate the gap the
/// same way the live table does.
pub fn branch_id_to_index(ordered_ids: &[DbId], target: Option<DbId>) -> Option<usize> {
    let target = target?;
    ordered_ids.iter().position(|&id| id == target)
}

/// Map a snapshot branch index back onto freshly inserted phase ids.
///
/// `new_ids` is the list of row ids produced by re-inserting the
/// snapshot's phases, in snapshot order. An index outside the list
/// (corrupt snapshot) maps to `None`.
pub fn branch_index_to_id(new_ids: &[DbId], index: Option<usize>) -> Option<DbId> {
    let index = index?;
    new_ids.get(index).copied()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_to_index_finds_position() {
        let ordered = vec![31, 45, 52];
        assert_eq!(branch_id_to_index(&ordered, Some(45)), Some(1));
        assert_eq!(branch_id_to_index(&ordered, Some(31)), Some(0));
    }

    #[test]
    fn id_to_index_tolerates_dangling_target() {
        let ordered = vec![31, 45];
        assert_eq!(branch_id_to_index(&ordered, Some(99)), None);
        assert_eq!(branch_id_to_index(&ordered, None), None);
    }

    #[test]
    fn index_to_id_maps_onto_fresh_rows() {
        let new_ids = vec![101, 102, 103];
        assert_eq!(branch_index_to_id(&new_ids, Some(2)), Some(103));
        assert_eq!(branch_index_to_id(&new_ids, None), None);
    }

    #[test]
    fn index_to_id_tolerates_corrupt_index() {
        let new_ids = vec![101];
        assert_eq!(branch_index_to_id(&new_ids, Some(5)), None);
    }

    #[test]
    fn round_trip_preserves_branch_wiring() {
        // Decision phase at index 0 branches to phases at indexes 1 and 2.
        let old_ids = vec![31, 45, 52];
        let success_idx = branch_id_to_index(&old_ids, Some(45));
        let failure_idx = branch_id_to_index(&old_ids, Some(52));

        let new_ids = vec![201, 202, 203];
        assert_eq!(branch_index_to_id(&new_ids, success_idx), Some(202));
        assert_eq!(branch_index_to_id(&new_ids, failure_idx), Some(203));
    }

    #[test]
    fn snapshot_document_round_trips_through_json() {
        let snapshot = VersionSnapshot {
            template: TemplateSnapshot {
                name: "Fellowship 2024".to_string(),
                description: Some("Annual fellowship".to_string()),
                is_private: true,
                status: "published".to_string(),
                visible_to_applicants: false,
                tags: vec!["fellowship".to_string()],
                applicant_instructions: None,
                manager_instructions: None,
            },
            phases: vec![PhaseSnapshot {
                name: "Application".to_string(),
                phase_type: "form".to_string(),
                order_index: 0,
                description: None,
                config: serde_json::json!({"fields": []}),
                starts_at: None,
                ends_at: None,
                applicant_instructions: None,
                manager_instructions: None,
                is_visible_to_applicants: true,
                branch_success_index: None,
                branch_failure_index: None,
            }],
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        let parsed: VersionSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.template.name, "Fellowship 2024");
        assert_eq!(parsed.phases.len(), 1);
        assert_eq!(parsed.phases[0].phase_type, "form");
    }
}
