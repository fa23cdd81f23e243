//! Business operations behind the handlers.
//!
//! Handlers stay thin: they extract, call one service function, and wrap
//! the result in a response type.

pub mod auth;
pub mod users;

use crate::ApiError;

/// bcrypt is CPU-bound; keep it off the async workers.
pub(crate) async fn hash_password(password: String) -> Result<String, ApiError> {
    Ok(tokio::task::spawn_blocking(move || ::auth::hash_password(&password)).await??)
}

pub(crate) async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    Ok(tokio::task::spawn_blocking(move || ::auth::verify_password(&password, &hash)).await??)
}
