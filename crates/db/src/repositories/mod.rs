//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-step mutations
//! (publish, rollback, reorder, clone, deep-copy, delete-with-compaction)
//! run inside a single transaction.

pub mod activity_repo;
pub mod campaign_repo;
pub mod phase_repo;
pub mod template_repo;
pub mod template_version_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use campaign_repo::CampaignRepo;
pub use phase_repo::PhaseRepo;
pub use template_repo::{TemplateFilter, TemplateRepo};
pub use template_version_repo::TemplateVersionRepo;
pub use user_repo::UserRepo;
