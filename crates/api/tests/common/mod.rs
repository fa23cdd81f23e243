//! Shared helpers for the HTTP tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use api::AppState;
use db::DbPool;
use settings::Settings;

pub const PASSWORD: &str = "correct horse battery staple";

pub fn test_settings() -> Settings {
    Settings::from_map([
        ("MODE", "TEST"),
        ("CORS_ORIGINS", "http://localhost:3000"),
        ("POSTGRES_DB", "app_test"),
        ("POSTGRES_USER", "postgres"),
        ("POSTGRES_PASSWORD", "postgres"),
        ("POSTGRES_HOST", "localhost"),
        ("POSTGRES_PORT", "5432"),
        ("JWT_ACCESS_SECRET", "test-access-secret"),
        ("JWT_REFRESH_SECRET", "test-refresh-secret"),
        ("JWT_ACCESS_EXPIRE_MINUTES", "15"),
        ("JWT_REFRESH_EXPIRE_MINUTES", "60"),
    ])
    .expect("test settings")
}

pub fn app(pool: DbPool) -> Router {
    api::router(AppState::new(pool, test_settings()))
}

/// A unique address per call so tests never collide on the email constraint.
pub fn email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    TestResponse { status, headers, body }
}

/// Register `email` and return its access token.
pub async fn register(app: &Router, email: &str) -> Value {
    let resp = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
    resp.body
}

pub async fn user_token(app: &Router) -> (String, String) {
    let email = email("user");
    let tokens = register(app, &email).await;
    (email, tokens["access_token"].as_str().expect("access token").to_string())
}

/// Seed an administrator directly and log them in.
pub async fn admin_token(app: &Router, pool: &DbPool) -> (Uuid, String) {
    let email = email("admin");
    let admin = api::service::users::create(pool, &email, PASSWORD, true)
        .await
        .expect("seed admin");
    let resp = send(
        app,
        Method::PATCH,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    (admin.id, resp.body["access_token"].as_str().expect("access token").to_string())
}
