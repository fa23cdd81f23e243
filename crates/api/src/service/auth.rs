//! Register, login and token refresh.

use tracing::info;

use auth::Tokens;
use db::repository::users as user_repo;
use db::DbError;

use crate::schemas::{UserCreate, UserLogin};
use crate::service::{users, verify_password};
use crate::{ApiError, AppState};

/// Create a regular user and log them in.
pub async fn register(state: &AppState, data: &UserCreate) -> Result<Tokens, ApiError> {
    info!(email = %data.email, "Registering user");
    let user = users::create(&state.pool, &data.email, &data.password, false).await?;
    Ok(state.jwt.create_tokens(user.id)?)
}

/// Check credentials and issue tokens.
///
/// Unknown email and wrong password are both `NotFound`, so callers cannot
/// tell which one failed.
pub async fn login(state: &AppState, data: &UserLogin) -> Result<Tokens, ApiError> {
    info!(email = %data.email, "Logging in user");
    let user = user_repo::find_user_by_email(&state.pool, &data.email)
        .await?
        .ok_or(ApiError::NotFound)?;

    if !verify_password(data.password.clone(), user.hashed_password.clone()).await? {
        return Err(ApiError::NotFound);
    }
    Ok(state.jwt.create_tokens(user.id)?)
}

/// Exchange a valid refresh token for a new pair.
pub async fn refresh(state: &AppState, refresh_token: &str) -> Result<Tokens, ApiError> {
    let user_id = state.jwt.decode_refresh(refresh_token)?;
    match user_repo::get_user(&state.pool, user_id).await {
        Ok(user) => Ok(state.jwt.create_tokens(user.id)?),
        Err(DbError::NotFound) => Err(ApiError::Unauthorized),
        Err(e) => Err(e.into()),
    }
}
