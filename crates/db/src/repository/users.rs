//! User CRUD operations.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    DbError,
    models::{NewUser, UserChanges, UserFilter, UserRow},
};

const USER_COLUMNS: &str = "id, email, hashed_password, is_admin, created_at, updated_at";

/// Insert a new user.
///
/// Returns `DbError::Conflict` if the email is already taken.
pub async fn create_user(pool: &PgPool, new: &NewUser) -> Result<UserRow, DbError> {
    let id = Uuid::new_v4();

    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (id, email, hashed_password, is_admin)
        VALUES ($1, $2, $3, $4)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&new.email)
    .bind(&new.hashed_password)
    .bind(new.is_admin)
    .fetch_one(pool)
    .await
    .map_err(DbError::from_write)?;

    Ok(row)
}

/// Fetch a single user by its primary key.
pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Fetch a user by exact email, if one exists.
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    qb.push(" WHERE TRUE");
    if let Some(id) = filter.id {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(email) = &filter.email {
        qb.push(" AND email ILIKE ").push_bind(format!("%{email}%"));
    }
    if let Some(is_admin) = filter.is_admin {
        qb.push(" AND is_admin = ").push_bind(is_admin);
    }
}

/// Return one page of users matching `filter`, ordered by creation time.
pub async fn list_users(
    pool: &PgPool,
    filter: &UserFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<UserRow>, DbError> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
    push_filters(&mut qb, filter);
    // `id` breaks ties between rows created in the same transaction.
    if filter.asc {
        qb.push(" ORDER BY created_at ASC, id ASC");
    } else {
        qb.push(" ORDER BY created_at DESC, id DESC");
    }
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);

    let rows = qb.build_query_as::<UserRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Count all users matching `filter`, ignoring pagination.
pub async fn count_users(pool: &PgPool, filter: &UserFilter) -> Result<i64, DbError> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
    push_filters(&mut qb, filter);

    let count = qb.build_query_scalar::<i64>().fetch_one(pool).await?;
    Ok(count)
}

/// Apply `changes` to a user and bump `updated_at`.
///
/// Returns `DbError::NotFound` if no such user exists and
/// `DbError::Conflict` if the new email is already taken.
pub async fn update_user(
    pool: &PgPool,
    id: Uuid,
    changes: &UserChanges,
) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET email = COALESCE($2, email),
            hashed_password = COALESCE($3, hashed_password),
            is_admin = COALESCE($4, is_admin),
            updated_at = now()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(changes.email.as_deref())
    .bind(changes.hashed_password.as_deref())
    .bind(changes.is_admin)
    .fetch_optional(pool)
    .await
    .map_err(DbError::from_write)?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Permanently delete a user by its primary key.
///
/// Returns `DbError::NotFound` if no row was deleted.
pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
