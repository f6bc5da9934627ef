//! The authorization guard: the single choke point every template
//! operation passes through before touching data.
//!
//! Handlers never decide template access themselves; they obtain a
//! [`TemplateAccess`] from one of the loaders here and work with the
//! template it carries. That makes it structurally hard to bypass the
//! rules: without an access token there is no template row to operate
//! on.
//!
//! The rules:
//! - **read**: admin, creator, or the template is public
//!   (`!is_private`) and `published`.
//! - **write / version**: admin or creator.
//! - **admin**: admin only.

use pathways_core::error::CoreError;
use pathways_core::template::TemplateStatus;
use pathways_core::types::DbId;

use pathways_db::models::template::Template;
use pathways_db::repositories::TemplateRepo;
use pathways_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Proof that the acting principal may operate on a template.
///
/// Produced only by the loaders in this module.
#[derive(Debug)]
pub struct TemplateAccess {
    /// The acting principal.
    pub actor: AuthUser,
    /// The template row loaded during the check.
    pub template: Template,
    /// Whether the actor holds the admin role.
    pub is_admin: bool,
}

/// Load a template and authorize the actor for read access.
///
/// Readable by admins and the creator always; by anyone else only when
/// the template is public and published.
pub async fn load_for_read(
    pool: &DbPool,
    actor: AuthUser,
    template_id: DbId,
) -> AppResult<TemplateAccess> {
    let template = load_template(pool, template_id).await?;
    let is_admin = actor.is_admin();

    let is_public_published = !template.is_private
        && template.status == TemplateStatus::Published.as_str();
    if !is_admin && template.creator_id != actor.user_id && !is_public_published {
        return Err(AppError::Core(CoreError::Forbidden(
            "This template is private".into(),
        )));
    }

    Ok(TemplateAccess {
        actor,
        template,
        is_admin,
    })
}

/// Load a template and authorize the actor for write (or version)
/// access. Only the creator and admins may mutate a template.
pub async fn load_for_write(
    pool: &DbPool,
    actor: AuthUser,
    template_id: DbId,
) -> AppResult<TemplateAccess> {
    let template = load_template(pool, template_id).await?;
    let is_admin = actor.is_admin();

    if !is_admin && template.creator_id != actor.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the template creator or an admin can modify this template".into(),
        )));
    }

    Ok(TemplateAccess {
        actor,
        template,
        is_admin,
    })
}

/// Authorize an admin-only operation. No template involved.
pub fn require_admin(actor: &AuthUser) -> AppResult<()> {
    if !actor.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin role required".into(),
        )));
    }
    Ok(())
}

async fn load_template(pool: &DbPool, template_id: DbId) -> AppResult<Template> {
    TemplateRepo::find_by_id(pool, template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: template_id,
        }))
}
