use axum::{
    extract::State,
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};

use auth::Tokens;

use crate::schemas::{RefreshRequest, UserCreate, UserLogin};
use crate::service::auth as auth_service;
use crate::{ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", patch(login))
        .route("/auth/refresh", patch(refresh))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<Tokens>), ApiError> {
    let tokens = auth_service::register(&state, &payload).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserLogin>,
) -> Result<Json<Tokens>, ApiError> {
    Ok(Json(auth_service::login(&state, &payload).await?))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<Tokens>, ApiError> {
    Ok(Json(auth_service::refresh(&state, &payload.refresh_token).await?))
}
