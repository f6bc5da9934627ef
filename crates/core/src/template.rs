//! Template lifecycle and field validation.
//!
//! Defines the closed template status set, the allowed status
//! transition matrix, and pure validators for template fields. The
//! repository and API layers both call into this module so the rules
//! live in exactly one place.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a pathway template.
///
/// Stored as lowercase text in the `status` column of
/// `pathway_templates`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStatus {
    Draft,
    PendingReview,
    Published,
    Archived,
}

impl TemplateStatus {
    /// The database text representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateStatus::Draft => "draft",
            TemplateStatus::PendingReview => "pending_review",
            TemplateStatus::Published => "published",
            TemplateStatus::Archived => "archived",
        }
    }

    /// Parse the database text representation.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "draft" => Ok(TemplateStatus::Draft),
            "pending_review" => Ok(TemplateStatus::PendingReview),
            "published" => Ok(TemplateStatus::Published),
            "archived" => Ok(TemplateStatus::Archived),
            other => Err(format!(
                "Invalid template status '{other}'. Must be one of: \
                 draft, pending_review, published, archived"
            )),
        }
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// The matrix:
    /// - `draft → pending_review | published | archived`
    /// - `pending_review → draft | published`
    /// - `published → archived`
    /// - `archived → draft` (unarchive)
    pub fn can_transition_to(&self, next: TemplateStatus) -> bool {
        use TemplateStatus::*;
        matches!(
            (*self, next),
            (Draft, PendingReview)
                | (Draft, Published)
                | (Draft, Archived)
                | (PendingReview, Draft)
                | (PendingReview, Published)
                | (Published, Archived)
                | (Archived, Draft)
        )
    }
}

impl std::fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a requested status transition.
pub fn validate_transition(current: &str, next: &str) -> Result<TemplateStatus, String> {
    let from = TemplateStatus::parse(current)?;
    let to = TemplateStatus::parse(next)?;
    if from == to {
        return Err(format!("Template is already in status '{to}'"));
    }
    if !from.can_transition_to(to) {
        return Err(format!("Cannot transition template from '{from}' to '{to}'"));
    }
    Ok(to)
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Maximum template name length in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 5_000;

/// Maximum number of tags per template.
pub const MAX_TAGS: usize = 20;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 50;

/// Validate a template name (non-empty after trimming, within length).
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Template name cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Template name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate a template description.
pub fn validate_description(description: &str) -> Result<(), String> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate a tag list (count, per-tag length, no blank tags).
pub fn validate_tags(tags: &[String]) -> Result<(), String> {
    if tags.len() > MAX_TAGS {
        return Err(format!("A template may carry at most {MAX_TAGS} tags"));
    }
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err("Tags cannot be empty".to_string());
        }
        if trimmed.chars().count() > MAX_TAG_LENGTH {
            return Err(format!(
                "Tag '{trimmed}' exceeds maximum length of {MAX_TAG_LENGTH} characters"
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
