//! HTTP-level integration tests for template CRUD, lifecycle,
//! publishing, cloning, and access control.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    build_test_app, create_test_user, delete_auth, expect_status, get_auth, post_auth,
    post_json_auth, put_json_auth, token_for,
};

/// Create a template through the API and return its id.
async fn create_template(app: axum::Router, token: &str, name: &str) -> i64 {
    let response = post_json_auth(
        app,
        "/api/v1/templates",
        token,
        json!({ "name": name, "tags": ["fellowship"] }),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    body["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_fetch_template(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "creator@example.com", "creator").await;
    let app = build_test_app(pool);
    let token = token_for(&user);

    let id = create_template(app.clone(), &token, "Fellowship 2026").await;

    let response = get_auth(app, &format!("/api/v1/templates/{id}"), &token).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["name"], "Fellowship 2026");
    assert_eq!(body["data"]["status"], "draft");
    assert_eq!(body["data"]["creator_id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_blank_name(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "creator@example.com", "creator").await;
    let app = build_test_app(pool);
    let token = token_for(&user);

    let response = post_json_auth(app, "/api/v1/templates", &token, json!({ "name": "   " })).await;
    let body = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_template_hidden_from_outsiders(pool: PgPool) {
    let (owner, _) = create_test_user(&pool, "owner@example.com", "creator").await;
    let (outsider, _) = create_test_user(&pool, "outsider@example.com", "creator").await;
    let app = build_test_app(pool.clone());

    let id = create_template(app.clone(), &token_for(&owner), "Secret").await;

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/templates/{id}"),
        &token_for(&outsider),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admins bypass the visibility rule.
    let (admin, _) = create_test_user(&pool, "admin@example.com", "admin").await;
    let response = get_auth(app, &format!("/api/v1/templates/{id}"), &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_creator_or_admin_may_modify(pool: PgPool) {
    let (owner, _) = create_test_user(&pool, "owner@example.com", "creator").await;
    let (outsider, _) = create_test_user(&pool, "outsider@example.com", "creator").await;
    let app = build_test_app(pool);

    let id = create_template(app.clone(), &token_for(&owner), "Mine").await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/templates/{id}"),
        &token_for(&outsider),
        json!({ "name": "Hijacked" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(
        app,
        &format!("/api/v1/templates/{id}"),
        &token_for(&outsider),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lifecycle_transitions_are_enforced(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "creator@example.com", "creator").await;
    let app = build_test_app(pool);
    let token = token_for(&user);

    let id = create_template(app.clone(), &token, "Lifecycle").await;

    // draft -> pending_review is legal.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/templates/{id}/status"),
        &token,
        json!({ "status": "pending_review" }),
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["status"], "pending_review");

    // pending_review -> archived is not in the matrix.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/templates/{id}/status"),
        &token,
        json!({ "status": "archived" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Publishing through the plain status endpoint is rejected; it
    // must go through the publish endpoint to get a snapshot.
    let response = put_json_auth(
        app,
        &format!("/api/v1/templates/{id}/status"),
        &token,
        json!({ "status": "published" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_snapshots_a_version(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "creator@example.com", "creator").await;
    let app = build_test_app(pool);
    let token = token_for(&user);

    let id = create_template(app.clone(), &token, "Publishable").await;

    let response = post_auth(app.clone(), &format!("/api/v1/templates/{id}/publish"), &token).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["status"], "published");

    let response = get_auth(app.clone(), &format!("/api/v1/templates/{id}/versions"), &token).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["version_number"], 1);

    // Publishing an already-published template is a conflict.
    let response = post_auth(app, &format!("/api/v1/templates/{id}/publish"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn clone_produces_independent_draft(pool: PgPool) {
    let (owner, _) = create_test_user(&pool, "owner@example.com", "creator").await;
    let (other, _) = create_test_user(&pool, "other@example.com", "creator").await;
    let app = build_test_app(pool);
    let owner_token = token_for(&owner);

    // Public + published so the other user may read (and thus clone) it.
    let id = {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/templates",
            &owner_token,
            json!({ "name": "Shared", "is_private": false }),
        )
        .await;
        let body = expect_status(response, StatusCode::CREATED).await;
        body["data"]["id"].as_i64().unwrap()
    };
    post_auth(app.clone(), &format!("/api/v1/templates/{id}/publish"), &owner_token).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/templates/{id}/clone"),
        &token_for(&other),
        json!({ "name": "My copy" }),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(body["data"]["status"], "draft");
    assert_eq!(body["data"]["creator_id"], other.id);
    assert_ne!(body["data"]["id"].as_i64().unwrap(), id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activity_feed_records_mutations(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "creator@example.com", "creator").await;
    let app = build_test_app(pool);
    let token = token_for(&user);

    let id = create_template(app.clone(), &token, "Audited").await;
    put_json_auth(
        app.clone(),
        &format!("/api/v1/templates/{id}"),
        &token,
        json!({ "description": "Changed" }),
    )
    .await;

    let response = get_auth(app, &format!("/api/v1/templates/{id}/activity"), &token).await;
    let body = expect_status(response, StatusCode::OK).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Newest first.
    assert_eq!(entries[0]["event_type"], "template_updated");
    assert_eq!(entries[1]["event_type"], "template_created");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_listing_requires_admin_role(pool: PgPool) {
    let (creator, _) = create_test_user(&pool, "creator@example.com", "creator").await;
    let (admin, _) = create_test_user(&pool, "admin@example.com", "admin").await;
    let app = build_test_app(pool);

    create_template(app.clone(), &token_for(&creator), "Private thing").await;

    let response = get_auth(app.clone(), "/api/v1/admin/templates", &token_for(&creator)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, "/api/v1/admin/templates", &token_for(&admin)).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
