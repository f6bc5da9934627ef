//! Integration tests for template CRUD, visibility rules, and cascade
//! deletion.

mod common;

use sqlx::PgPool;

use pathways_core::template::TemplateStatus;
use pathways_db::models::template::{CreateTemplate, UpdateTemplate};
use pathways_db::repositories::{
    TemplateFilter, TemplateRepo, TemplateVersionRepo, UserRepo,
};

use common::{new_template, seed_template_with_phases, seed_user};

fn filter() -> TemplateFilter {
    TemplateFilter {
        status: None,
        tag: None,
        limit: 50,
        offset: 0,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_templates_start_private_drafts(pool: PgPool) {
    let user = seed_user(&pool, "creator@example.com").await;
    let template = TemplateRepo::create(&pool, user.id, &new_template("Fellowship"))
        .await
        .unwrap();

    assert_eq!(template.status, "draft");
    assert!(template.is_private);
    assert!(!template.visible_to_applicants);
    assert_eq!(template.creator_id, user.id);
    assert_eq!(template.last_updated_by, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_patches_only_provided_fields(pool: PgPool) {
    let user = seed_user(&pool, "creator@example.com").await;
    let template = TemplateRepo::create(&pool, user.id, &new_template("Fellowship"))
        .await
        .unwrap();

    let updated = TemplateRepo::update(
        &pool,
        template.id,
        &UpdateTemplate {
            name: None,
            description: Some("New description".to_string()),
            is_private: None,
            visible_to_applicants: None,
            tags: None,
            applicant_instructions: None,
            manager_instructions: None,
        },
        user.id,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Fellowship");
    assert_eq!(updated.description.as_deref(), Some("New description"));
    assert_eq!(updated.tags, vec!["fellowship".to_string()]);
    assert_eq!(updated.last_updated_by, Some(user.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn outsiders_see_only_public_published_templates(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let outsider = seed_user(&pool, "outsider@example.com").await;

    // Private draft.
    TemplateRepo::create(&pool, owner.id, &new_template("Private draft"))
        .await
        .unwrap();
    // Public published.
    let public = TemplateRepo::create(
        &pool,
        owner.id,
        &CreateTemplate {
            name: "Public".to_string(),
            description: None,
            is_private: Some(false),
            visible_to_applicants: None,
            tags: None,
            applicant_instructions: None,
            manager_instructions: None,
        },
    )
    .await
    .unwrap();
    TemplateRepo::set_status(&pool, public.id, TemplateStatus::Published, owner.id)
        .await
        .unwrap();
    // Public but still draft: not visible to outsiders.
    TemplateRepo::create(
        &pool,
        owner.id,
        &CreateTemplate {
            name: "Public draft".to_string(),
            description: None,
            is_private: Some(false),
            visible_to_applicants: None,
            tags: None,
            applicant_instructions: None,
            manager_instructions: None,
        },
    )
    .await
    .unwrap();

    let visible = TemplateRepo::list_visible(&pool, outsider.id, false, &filter())
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Public");

    // The owner sees all three.
    let own = TemplateRepo::list_visible(&pool, owner.id, false, &filter())
        .await
        .unwrap();
    assert_eq!(own.len(), 3);

    // So does an admin.
    let all = TemplateRepo::list_visible(&pool, outsider.id, true, &filter())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_status_and_tag(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    TemplateRepo::create(&pool, owner.id, &new_template("Tagged"))
        .await
        .unwrap();
    TemplateRepo::create(
        &pool,
        owner.id,
        &CreateTemplate {
            name: "Untagged".to_string(),
            description: None,
            is_private: None,
            visible_to_applicants: None,
            tags: None,
            applicant_instructions: None,
            manager_instructions: None,
        },
    )
    .await
    .unwrap();

    let tagged = TemplateRepo::list_visible(
        &pool,
        owner.id,
        false,
        &TemplateFilter {
            tag: Some("fellowship".to_string()),
            ..filter()
        },
    )
    .await
    .unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].name, "Tagged");

    let drafts = TemplateRepo::list_visible(
        &pool,
        owner.id,
        false,
        &TemplateFilter {
            status: Some("draft".to_string()),
            ..filter()
        },
    )
    .await
    .unwrap();
    assert_eq!(drafts.len(), 2);

    let archived = TemplateRepo::list_visible(
        &pool,
        owner.id,
        false,
        &TemplateFilter {
            status: Some("archived".to_string()),
            ..filter()
        },
    )
    .await
    .unwrap();
    assert!(archived.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_cascades_to_phases_and_versions(pool: PgPool) {
    let user = seed_user(&pool, "creator@example.com").await;
    let (template_id, _) = seed_template_with_phases(&pool, user.id, "Doomed", 3).await;
    TemplateVersionRepo::create(&pool, template_id, user.id)
        .await
        .unwrap()
        .unwrap();

    let deleted = TemplateRepo::delete(&pool, template_id).await.unwrap();
    assert!(deleted);

    let phase_count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM template_phases WHERE template_id = $1")
            .bind(template_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(phase_count.0, 0);

    let version_count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM template_versions WHERE template_id = $1")
            .bind(template_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(version_count.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_violates_unique_constraint(pool: PgPool) {
    seed_user(&pool, "same@example.com").await;

    let result = UserRepo::create(
        &pool,
        &pathways_db::models::user::CreateUser {
            email: "same@example.com".to_string(),
            password_hash: "x".to_string(),
            display_name: "Dup".to_string(),
            role: "creator".to_string(),
        },
    )
    .await;

    let err = result.expect_err("duplicate email must be rejected");
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}
