//! Integration tests for the phase ordering invariant: every
//! template's phases hold contiguous order indexes `0..n-1` after
//! insertion, reordering, and deletion.

mod common;

use sqlx::PgPool;

use pathways_core::ordering::ReorderEntry;
use pathways_db::repositories::PhaseRepo;

use common::{new_phase, seed_template_with_phases, seed_user};

#[sqlx::test(migrations = "../../db/migrations")]
async fn appended_phases_are_contiguous(pool: PgPool) {
    let user = seed_user(&pool, "creator@example.com").await;
    let (template_id, _) = seed_template_with_phases(&pool, user.id, "Ordering", 4).await;

    let phases = PhaseRepo::list_by_template(&pool, template_id).await.unwrap();
    let indexes: Vec<i32> = phases.iter().map(|p| p.order_index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mid_list_insert_shifts_siblings(pool: PgPool) {
    let user = seed_user(&pool, "creator@example.com").await;
    let (template_id, phase_ids) = seed_template_with_phases(&pool, user.id, "Ordering", 3).await;

    let inserted = PhaseRepo::create(&pool, template_id, &new_phase("Inserted", "review", 1))
        .await
        .unwrap();
    assert_eq!(inserted.order_index, 1);

    let phases = PhaseRepo::list_by_template(&pool, template_id).await.unwrap();
    let ordered: Vec<(i64, i32)> = phases.iter().map(|p| (p.id, p.order_index)).collect();
    assert_eq!(
        ordered,
        vec![
            (phase_ids[0], 0),
            (inserted.id, 1),
            (phase_ids[1], 2),
            (phase_ids[2], 3),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_applies_full_permutation(pool: PgPool) {
    let user = seed_user(&pool, "creator@example.com").await;
    let (template_id, phase_ids) = seed_template_with_phases(&pool, user.id, "Ordering", 3).await;

    // Reverse the order.
    let batch = vec![
        ReorderEntry { id: phase_ids[0], order_index: 2 },
        ReorderEntry { id: phase_ids[1], order_index: 1 },
        ReorderEntry { id: phase_ids[2], order_index: 0 },
    ];
    PhaseRepo::reorder(&pool, template_id, &batch).await.unwrap();

    let phases = PhaseRepo::list_by_template(&pool, template_id).await.unwrap();
    let ids: Vec<i64> = phases.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![phase_ids[2], phase_ids[1], phase_ids[0]]);
    let indexes: Vec<i32> = phases.iter().map(|p| p.order_index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_compacts_remaining_indexes(pool: PgPool) {
    let user = seed_user(&pool, "creator@example.com").await;
    let (template_id, phase_ids) = seed_template_with_phases(&pool, user.id, "Ordering", 4).await;

    let deleted = PhaseRepo::delete_with_compaction(&pool, phase_ids[1]).await.unwrap();
    assert!(deleted);

    let phases = PhaseRepo::list_by_template(&pool, template_id).await.unwrap();
    let ordered: Vec<(i64, i32)> = phases.iter().map(|p| (p.id, p.order_index)).collect();
    assert_eq!(
        ordered,
        vec![(phase_ids[0], 0), (phase_ids[2], 1), (phase_ids[3], 2)]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_nulls_dangling_branch_references(pool: PgPool) {
    let user = seed_user(&pool, "creator@example.com").await;
    let (template_id, _) = seed_template_with_phases(&pool, user.id, "Ordering", 0).await;

    // decision phase branching to two later phases.
    let decision = PhaseRepo::create(&pool, template_id, &new_phase("Decide", "decision", 0))
        .await
        .unwrap();
    let accept = PhaseRepo::create(&pool, template_id, &new_phase("Accept", "email", 1))
        .await
        .unwrap();
    let reject = PhaseRepo::create(&pool, template_id, &new_phase("Reject", "email", 2))
        .await
        .unwrap();
    PhaseRepo::update_branching(&pool, decision.id, Some(accept.id), Some(reject.id))
        .await
        .unwrap();

    PhaseRepo::delete_with_compaction(&pool, accept.id).await.unwrap();

    let decision = PhaseRepo::find_by_id(&pool, decision.id).await.unwrap().unwrap();
    assert_eq!(decision.branch_success_phase_id, None);
    assert_eq!(decision.branch_failure_phase_id, Some(reject.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_of_missing_phase_returns_false(pool: PgPool) {
    let deleted = PhaseRepo::delete_with_compaction(&pool, 999_999).await.unwrap();
    assert!(!deleted);
}
