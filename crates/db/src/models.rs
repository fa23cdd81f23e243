//! Row structs that map 1-to-1 onto database tables, plus the small input
//! structs the repository functions take.
//!
//! These are *persistence* models and carry no domain behaviour.
//! API schemas live in the `api` crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// A persisted user row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    /// bcrypt hash, never the plain password.
    pub hashed_password: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a new `users` row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub is_admin: bool,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub is_admin: Option<bool>,
}

/// Filters for listing users. Every `Some` field narrows the result.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub id: Option<Uuid>,
    /// Case-insensitive substring match.
    pub email: Option<String>,
    pub is_admin: Option<bool>,
    /// Oldest first when `true`, newest first otherwise.
    pub asc: bool,
}
