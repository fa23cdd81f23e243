use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::extract::{AdminUser, CurrentUser};
use crate::schemas::{
    UserCreateAdmin, UserGet, UserGetAdmin, UserList, UserUpdate, UserUpdateAdmin, UsersQuery,
};
use crate::service::users as user_service;
use crate::{ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/me", get(me).patch(update_me))
        .route("/users/:id", get(get_one).put(update).delete(delete))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserGet> {
    Json(user.into())
}

pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserGet>, ApiError> {
    // Non-admins never get to touch `is_admin`, not even their own.
    let updated =
        user_service::update(&state.pool, user.id, payload.email, payload.password, None).await?;
    Ok(Json(updated.into()))
}

pub async fn get_one(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<UserGet>, ApiError> {
    Ok(Json(user_service::get_by_id(&state.pool, id).await?.into()))
}

pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<UsersQuery>,
) -> Result<Json<UserList>, ApiError> {
    let (rows, count) = user_service::list(&state.pool, &query).await?;
    Ok(Json(UserList {
        count,
        data: rows.into_iter().map(UserGetAdmin::from).collect(),
        asc: query.asc,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<UserCreateAdmin>,
) -> Result<(StatusCode, Json<UserGetAdmin>), ApiError> {
    let user = user_service::create(&state.pool, &payload.email, &payload.password, payload.is_admin)
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<UserUpdateAdmin>,
) -> Result<Json<UserGetAdmin>, ApiError> {
    let updated = user_service::update(
        &state.pool,
        id,
        payload.email,
        payload.password,
        Some(payload.is_admin),
    )
    .await?;
    Ok(Json(updated.into()))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<StatusCode, ApiError> {
    user_service::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
