//! User management.

use tracing::info;
use uuid::Uuid;

use db::models::{NewUser, UserChanges, UserRow};
use db::repository::users as user_repo;
use db::DbPool;

use crate::schemas::{require_non_blank, UsersQuery};
use crate::service::hash_password;
use crate::ApiError;

/// Create a user. Fails with `Conflict` when the email is taken.
pub async fn create(
    pool: &DbPool,
    email: &str,
    password: &str,
    is_admin: bool,
) -> Result<UserRow, ApiError> {
    require_non_blank("email", email)?;
    require_non_blank("password", password)?;
    info!(email, is_admin, "Creating user");

    let hashed_password = hash_password(password.to_string()).await?;
    let user = user_repo::create_user(
        pool,
        &NewUser {
            email: email.to_string(),
            hashed_password,
            is_admin,
        },
    )
    .await?;
    Ok(user)
}

pub async fn get_by_id(pool: &DbPool, id: Uuid) -> Result<UserRow, ApiError> {
    Ok(user_repo::get_user(pool, id).await?)
}

/// One page of users matching `query`, plus the total match count.
///
/// An empty page is reported as `NotFound`.
pub async fn list(pool: &DbPool, query: &UsersQuery) -> Result<(Vec<UserRow>, i64), ApiError> {
    let filter = query.filter();
    let rows = user_repo::list_users(pool, &filter, query.limit.into(), query.offset.into()).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound);
    }
    let count = user_repo::count_users(pool, &filter).await?;
    Ok((rows, count))
}

/// Update a user. `None` fields are left as they are; a new password is
/// hashed before it is stored.
pub async fn update(
    pool: &DbPool,
    id: Uuid,
    email: Option<String>,
    password: Option<String>,
    is_admin: Option<bool>,
) -> Result<UserRow, ApiError> {
    info!(%id, "Updating user");
    if let Some(email) = &email {
        require_non_blank("email", email)?;
    }
    let hashed_password = match password.filter(|p| !p.is_empty()) {
        Some(p) => Some(hash_password(p).await?),
        None => None,
    };

    let changes = UserChanges {
        email,
        hashed_password,
        is_admin,
    };
    Ok(user_repo::update_user(pool, id, &changes).await?)
}

pub async fn delete(pool: &DbPool, id: Uuid) -> Result<(), ApiError> {
    info!(%id, "Deleting user");
    Ok(user_repo::delete_user(pool, id).await?)
}
