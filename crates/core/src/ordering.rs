//! Order-index invariant checking for phase reordering.
//!
//! A template's phases must always carry `order_index` values that form
//! exactly the permutation `0..n-1`. Reorder batches are validated
//! against the full sibling set before anything is written, so a
//! partial or malformed batch is rejected outright instead of leaving
//! the template with gaps or duplicates.

use std::collections::HashSet;

use crate::types::DbId;

/// One entry in a reorder batch: a phase id and its requested index.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct ReorderEntry {
    pub id: DbId,
    pub order_index: i32,
}

/// Validate a reorder batch against the template's current phase ids.
///
/// The batch must:
/// - cover every phase of the template exactly once (no gaps, no
///   duplicates, no foreign ids), and
/// - assign the index set `{0, …, n-1}` exactly once each.
pub fn validate_reorder(entries: &[ReorderEntry], sibling_ids: &[DbId]) -> Result<(), String> {
    let n = sibling_ids.len();
    if entries.len() != n {
        return Err(format!(
            "Reorder batch must cover all {n} phases of the template, got {}",
            entries.len()
        ));
    }

    let sibling_set: HashSet<DbId> = sibling_ids.iter().copied().collect();
    let mut seen_ids: HashSet<DbId> = HashSet::with_capacity(n);
    let mut seen_indexes: HashSet<i32> = HashSet::with_capacity(n);

    for entry in entries {
        if !sibling_set.contains(&entry.id) {
            return Err(format!(
                "Phase {} does not belong to this template",
                entry.id
            ));
        }
        if !seen_ids.insert(entry.id) {
            return Err(format!("Phase {} appears more than once in the batch", entry.id));
        }
        if entry.order_index < 0 || entry.order_index as usize >= n {
            return Err(format!(
                "Order index {} is out of range 0..{n}",
                entry.order_index
            ));
        }
        if !seen_indexes.insert(entry.order_index) {
            return Err(format!(
                "Order index {} is assigned more than once",
                entry.order_index
            ));
        }
    }

    Ok(())
}

/// Compute compacted `(id, new_index)` assignments after removing one
/// phase from an ordered sibling list.
///
/// `ordered_ids` is the template's phase ids sorted by current
/// `order_index`, still including `removed_id`. Returns only the
/// assignments that change, so callers issue the minimum number of
/// updates.
pub fn compact_after_removal(ordered_ids: &[DbId], removed_id: DbId) -> Vec<(DbId, i32)> {
    let mut assignments = Vec::new();
    let mut next_index = 0i32;
    let mut current_index = 0i32;

    for &id in ordered_ids {
        if id == removed_id {
            current_index += 1;
            continue;
        }
        if next_index != current_index {
            assignments.push((id, next_index));
        }
        next_index += 1;
        current_index += 1;
    }

    assignments
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
