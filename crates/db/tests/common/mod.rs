//! Shared fixtures for repository integration tests.

use sqlx::PgPool;

use pathways_core::types::DbId;
use pathways_db::models::phase::CreatePhase;
use pathways_db::models::template::CreateTemplate;
use pathways_db::models::user::{CreateUser, User};
use pathways_db::repositories::{PhaseRepo, TemplateRepo, UserRepo};

pub async fn seed_user(pool: &PgPool, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$fake-hash-for-tests".to_string(),
            display_name: "Test User".to_string(),
            role: "creator".to_string(),
        },
    )
    .await
    .expect("seed user")
}

pub fn new_template(name: &str) -> CreateTemplate {
    CreateTemplate {
        name: name.to_string(),
        description: Some("Selection pathway".to_string()),
        is_private: None,
        visible_to_applicants: None,
        tags: Some(vec!["fellowship".to_string()]),
        applicant_instructions: None,
        manager_instructions: None,
    }
}

pub fn new_phase(name: &str, phase_type: &str, order_index: i32) -> CreatePhase {
    CreatePhase {
        name: name.to_string(),
        phase_type: phase_type.to_string(),
        order_index,
        description: None,
        config: None,
        starts_at: None,
        ends_at: None,
        applicant_instructions: None,
        manager_instructions: None,
        is_visible_to_applicants: None,
    }
}

/// Seed a template with `n` form phases appended in order. Returns the
/// template id and the phase ids in order.
pub async fn seed_template_with_phases(
    pool: &PgPool,
    creator_id: DbId,
    name: &str,
    n: i32,
) -> (DbId, Vec<DbId>) {
    let template = TemplateRepo::create(pool, creator_id, &new_template(name))
        .await
        .expect("seed template");

    let mut phase_ids = Vec::with_capacity(n as usize);
    for i in 0..n {
        let phase = PhaseRepo::create(
            pool,
            template.id,
            &new_phase(&format!("Step {i}"), "form", i),
        )
        .await
        .expect("seed phase");
        phase_ids.push(phase.id);
    }

    (template.id, phase_ids)
}
