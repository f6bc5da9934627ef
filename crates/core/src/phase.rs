//! Phase types, branching eligibility, and phase field validation.
//!
//! The phase type set is closed: every phase in a template is exactly
//! one of the seven variants below. Only `decision` and `review`
//! phases may carry branch targets.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Phase type
// ---------------------------------------------------------------------------

/// The closed set of phase types.
///
/// Stored as lowercase text in the `phase_type` column of
/// `template_phases` and `campaign_phases`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseType {
    Form,
    Review,
    Email,
    Scheduling,
    Decision,
    Recommendation,
    Screening,
}

impl PhaseType {
    /// The database text representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseType::Form => "form",
            PhaseType::Review => "review",
            PhaseType::Email => "email",
            PhaseType::Scheduling => "scheduling",
            PhaseType::Decision => "decision",
            PhaseType::Recommendation => "recommendation",
            PhaseType::Screening => "screening",
        }
    }

    /// Parse the database text representation.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "form" => Ok(PhaseType::Form),
            "review" => Ok(PhaseType::Review),
            "email" => Ok(PhaseType::Email),
            "scheduling" => Ok(PhaseType::Scheduling),
            "decision" => Ok(PhaseType::Decision),
            "recommendation" => Ok(PhaseType::Recommendation),
            "screening" => Ok(PhaseType::Screening),
            other => Err(format!(
                "Invalid phase type '{other}'. Must be one of: form, review, \
                 email, scheduling, decision, recommendation, screening"
            )),
        }
    }

    /// Whether phases of this type may carry branch targets.
    pub fn supports_branching(&self) -> bool {
        matches!(self, PhaseType::Decision | PhaseType::Review)
    }
}

impl std::fmt::Display for PhaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Maximum phase name length in characters.
pub const MAX_PHASE_NAME_LENGTH: usize = 200;

/// Validate a phase name.
pub fn validate_phase_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Phase name cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_PHASE_NAME_LENGTH {
        return Err(format!(
            "Phase name exceeds maximum length of {MAX_PHASE_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate an order index supplied on phase creation.
///
/// Callers supply the current phase count for append semantics; the
/// index must not exceed it.
pub fn validate_order_index(order_index: i32, phase_count: i64) -> Result<(), String> {
    if order_index < 0 {
        return Err("Order index must be non-negative".to_string());
    }
    if i64::from(order_index) > phase_count {
        return Err(format!(
            "Order index {order_index} is out of range for a template with {phase_count} phases"
        ));
    }
    Ok(())
}

/// Validate an optional start/end date pair.
pub fn validate_date_window(
    starts_at: Option<crate::types::Timestamp>,
    ends_at: Option<crate::types::Timestamp>,
) -> Result<(), String> {
    if let (Some(start), Some(end)) = (starts_at, ends_at) {
        if end < start {
            return Err("Phase end date cannot precede its start date".to_string());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Branching validation
// ---------------------------------------------------------------------------

/// Requested branch targets for a decision/review phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchTargets {
    pub success: Option<DbId>,
    pub failure: Option<DbId>,
}

/// Validate branch targets for a phase.
///
/// - The phase type must support branching.
/// - Each non-null target must be a *different* phase of the same
///   template (`sibling_ids` is the id set of the template's phases,
///   including `phase_id` itself).
pub fn validate_branch_targets(
    phase_id: DbId,
    phase_type: PhaseType,
    targets: BranchTargets,
    sibling_ids: &[DbId],
) -> Result<(), String> {
    if (targets.success.is_some() || targets.failure.is_some()) && !phase_type.supports_branching()
    {
        return Err(format!(
            "Phase type '{phase_type}' does not support branching; \
             only decision and review phases do"
        ));
    }

    for (label, target) in [("success", targets.success), ("failure", targets.failure)] {
        let Some(target_id) = target else { continue };
        if target_id == phase_id {
            return Err(format!("A phase cannot use itself as its {label} branch target"));
        }
        if !sibling_ids.contains(&target_id) {
            return Err(format!(
                "Invalid {label} branch target: phase {target_id} does not \
                 belong to the same template"
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- phase type ----------------------------------------------------------

    #[test]
    fn parse_round_trips_all_types() {
        for t in [
            PhaseType::Form,
            PhaseType::Review,
            PhaseType::Email,
            PhaseType::Scheduling,
            PhaseType::Decision,
            PhaseType::Recommendation,
            PhaseType::Screening,
        ] {
            assert_eq!(PhaseType::parse(t.as_str()).unwrap(), t);
        }
    }

    #[test]
    fn parse_rejects_unknown_type() {
        assert!(PhaseType::parse("interview").is_err());
        assert!(PhaseType::parse("").is_err());
        // Case sensitive, matching the stored representation.
        assert!(PhaseType::parse("Form").is_err());
    }

    #[test]
    fn only_decision_and_review_branch() {
        assert!(PhaseType::Decision.supports_branching());
        assert!(PhaseType::Review.supports_branching());
        assert!(!PhaseType::Form.supports_branching());
        assert!(!PhaseType::Email.supports_branching());
        assert!(!PhaseType::Scheduling.supports_branching());
        assert!(!PhaseType::Recommendation.supports_branching());
        assert!(!PhaseType::Screening.supports_branching());
    }

    // -- order index ---------------------------------------------------------

    #[test]
    fn negative_order_index_rejected() {
        assert!(validate_order_index(-1, 3).is_err());
    }

    #[test]
    fn append_index_accepted() {
        // Appending to a 3-phase template means index 3.
        assert!(validate_order_index(3, 3).is_ok());
        assert!(validate_order_index(0, 0).is_ok());
    }

    #[test]
    fn index_past_append_position_rejected() {
        let result = validate_order_index(5, 3);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("out of range"));
    }

    // -- date window ---------------------------------------------------------

    #[test]
    fn inverted_date_window_rejected() {
        let start = chrono::Utc::now();
        let end = start - chrono::Duration::days(1);
        assert!(validate_date_window(Some(start), Some(end)).is_err());
    }

    #[test]
    fn open_ended_windows_accepted() {
        let now = chrono::Utc::now();
        assert!(validate_date_window(None, None).is_ok());
        assert!(validate_date_window(Some(now), None).is_ok());
        assert!(validate_date_window(None, Some(now)).is_ok());
    }

    // -- branching -----------------------------------------------------------

    #[test]
    fn branch_targets_must_be_siblings() {
        let siblings = vec![10, 11, 12];
        let targets = BranchTargets {
            success: Some(99),
            failure: None,
        };
        let result = validate_branch_targets(10, PhaseType::Decision, targets, &siblings);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .contains("does not belong to the same template"));
    }

    #[test]
    fn self_reference_rejected() {
        let siblings = vec![10, 11];
        let targets = BranchTargets {
            success: Some(10),
            failure: None,
        };
        let result = validate_branch_targets(10, PhaseType::Decision, targets, &siblings);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("itself"));
    }

    #[test]
    fn non_branching_type_rejected() {
        let siblings = vec![10, 11];
        let targets = BranchTargets {
            success: Some(11),
            failure: None,
        };
        let result = validate_branch_targets(10, PhaseType::Form, targets, &siblings);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("does not support branching"));
    }

    #[test]
    fn clearing_branches_is_always_valid() {
        // Null targets are fine even on a non-branching type (clears state).
        let targets = BranchTargets::default();
        assert!(validate_branch_targets(10, PhaseType::Form, targets, &[10]).is_ok());
    }

    #[test]
    fn valid_sibling_targets_accepted() {
        let siblings = vec![10, 11, 12];
        let targets = BranchTargets {
            success: Some(11),
            failure: Some(12),
        };
        assert!(validate_branch_targets(10, PhaseType::Review, targets, &siblings).is_ok());
    }
}
