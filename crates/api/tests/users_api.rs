//! `/users` routes against a live Postgres.
#![cfg(feature = "integration")]

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{admin_token, app, email, register, send, user_token, PASSWORD};
use db::DbPool;

// ============================================================
// self service
// ============================================================

#[sqlx::test(migrations = "../../migrations")]
async fn me_hides_admin_flag(pool: DbPool) {
    let app = app(pool);
    let (address, token) = user_token(&app).await;

    let resp = send(&app, Method::GET, "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["email"], address.as_str());
    assert!(resp.body.get("is_admin").is_none());
    assert!(resp.body.get("hashed_password").is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_me_changes_email_and_password(pool: DbPool) {
    let app = app(pool);
    let (_, token) = user_token(&app).await;
    let new_address = email("renamed");

    let resp = send(
        &app,
        Method::PATCH,
        "/api/v1/users/me",
        Some(&token),
        Some(json!({ "email": new_address, "password": "new password" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["email"], new_address.as_str());

    let login = send(
        &app,
        Method::PATCH,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": new_address, "password": "new password" })),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_me_cannot_grant_admin(pool: DbPool) {
    let app = app(pool.clone());
    let (address, token) = user_token(&app).await;

    let resp = send(
        &app,
        Method::PATCH,
        "/api/v1/users/me",
        Some(&token),
        Some(json!({ "is_admin": true })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);

    let row = db::repository::users::find_user_by_email(&pool, &address)
        .await
        .unwrap()
        .unwrap();
    assert!(!row.is_admin);
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_me_to_taken_email_conflicts(pool: DbPool) {
    let app = app(pool);
    let taken = email("taken");
    register(&app, &taken).await;
    let (_, token) = user_token(&app).await;

    let resp = send(
        &app,
        Method::PATCH,
        "/api/v1/users/me",
        Some(&token),
        Some(json!({ "email": taken })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../migrations")]
async fn any_user_can_read_another_by_id(pool: DbPool) {
    let app = app(pool.clone());
    let (admin_id, _) = admin_token(&app, &pool).await;
    let (_, token) = user_token(&app).await;

    let resp = send(&app, Method::GET, &format!("/api/v1/users/{admin_id}"), Some(&token), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["id"], admin_id.to_string());
    assert!(resp.body.get("is_admin").is_none());

    let missing = uuid::Uuid::new_v4();
    let resp = send(&app, Method::GET, &format!("/api/v1/users/{missing}"), Some(&token), None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

// ============================================================
// admin gate
// ============================================================

#[sqlx::test(migrations = "../../migrations")]
async fn regular_users_are_forbidden_from_admin_routes(pool: DbPool) {
    let app = app(pool);
    let (_, token) = user_token(&app).await;
    let id = uuid::Uuid::new_v4();

    let list = send(&app, Method::GET, "/api/v1/users", Some(&token), None).await;
    let create = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(&token),
        Some(json!({ "email": email("x"), "password": PASSWORD, "is_admin": true })),
    )
    .await;
    let update = send(
        &app,
        Method::PUT,
        &format!("/api/v1/users/{id}"),
        Some(&token),
        Some(json!({ "is_admin": true })),
    )
    .await;
    let delete = send(&app, Method::DELETE, &format!("/api/v1/users/{id}"), Some(&token), None).await;

    for resp in [list, create, update, delete] {
        assert_eq!(resp.status, StatusCode::FORBIDDEN);
        assert_eq!(resp.body["detail"], "Not enough permissions");
    }
}

// ============================================================
// admin operations
// ============================================================

#[sqlx::test(migrations = "../../migrations")]
async fn admin_creates_admin(pool: DbPool) {
    let app = app(pool.clone());
    let (_, token) = admin_token(&app, &pool).await;
    let address = email("second-admin");

    let resp = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(&token),
        Some(json!({ "email": address, "password": PASSWORD, "is_admin": true })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["email"], address.as_str());
    assert_eq!(resp.body["is_admin"], true);

    let again = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(&token),
        Some(json!({ "email": address, "password": PASSWORD, "is_admin": false })),
    )
    .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../migrations")]
async fn admin_updates_and_deletes(pool: DbPool) {
    let app = app(pool.clone());
    let (_, token) = admin_token(&app, &pool).await;
    let address = email("target");
    register(&app, &address).await;
    let target = db::repository::users::find_user_by_email(&pool, &address)
        .await
        .unwrap()
        .unwrap();

    let resp = send(
        &app,
        Method::PUT,
        &format!("/api/v1/users/{}", target.id),
        Some(&token),
        Some(json!({ "is_admin": true })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["is_admin"], true);
    assert_eq!(resp.body["email"], address.as_str());

    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/users/{}", target.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let again = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/users/{}", target.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let update_missing = send(
        &app,
        Method::PUT,
        &format!("/api/v1/users/{}", target.id),
        Some(&token),
        Some(json!({ "is_admin": false })),
    )
    .await;
    assert_eq!(update_missing.status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_filters_and_paginates(pool: DbPool) {
    let app = app(pool.clone());
    let (_, token) = admin_token(&app, &pool).await;
    for i in 0..3 {
        register(&app, &format!("listed-{i}@Example.org")).await;
    }

    let all = send(&app, Method::GET, "/api/v1/users", Some(&token), None).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["count"], 4);
    assert_eq!(all.body["asc"], false);
    assert_eq!(all.body["data"][0]["email"], "listed-2@Example.org");

    let filtered = send(
        &app,
        Method::GET,
        "/api/v1/users?email=example.ORG&asc=true&limit=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(filtered.status, StatusCode::OK);
    assert_eq!(filtered.body["count"], 3);
    assert_eq!(filtered.body["asc"], true);
    let data = filtered.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["email"], "listed-0@Example.org");

    let admins = send(&app, Method::GET, "/api/v1/users?is_admin=true", Some(&token), None).await;
    assert_eq!(admins.body["count"], 1);
    assert_eq!(admins.body["data"][0]["is_admin"], true);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_edge_cases(pool: DbPool) {
    let app = app(pool.clone());
    let (_, token) = admin_token(&app, &pool).await;

    let past_end = send(&app, Method::GET, "/api/v1/users?offset=50", Some(&token), None).await;
    assert_eq!(past_end.status, StatusCode::NOT_FOUND);

    let unknown = send(&app, Method::GET, "/api/v1/users?role=admin", Some(&token), None).await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
}
