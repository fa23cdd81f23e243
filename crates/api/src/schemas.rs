//! Request and response bodies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use db::models::{UserFilter, UserRow};
use settings::Mode;

use crate::ApiError;

pub const DEFAULT_QUERY_OFFSET: u32 = 0;
pub const DEFAULT_QUERY_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// health check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub mode: Mode,
    pub version: String,
    pub status: String,
}

// ---------------------------------------------------------------------------
// auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLogin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// What any authenticated user may see about a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGet {
    pub id: Uuid,
    pub email: String,
}

impl From<UserRow> for UserGet {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
        }
    }
}

/// What administrators see about a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGetAdmin {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

impl From<UserRow> for UserGetAdmin {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            is_admin: row.is_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreateAdmin {
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdateAdmin {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub is_admin: bool,
}

/// One page of users plus the total number of matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    /// Matches ignoring pagination.
    pub count: i64,
    pub data: Vec<UserGetAdmin>,
    pub asc: bool,
}

/// Query string of `GET /users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersQuery {
    #[serde(default = "default_offset")]
    pub offset: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub id: Option<Uuid>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub asc: bool,
}

fn default_offset() -> u32 {
    DEFAULT_QUERY_OFFSET
}

fn default_limit() -> u32 {
    DEFAULT_QUERY_LIMIT
}

impl Default for UsersQuery {
    fn default() -> Self {
        Self {
            offset: DEFAULT_QUERY_OFFSET,
            limit: DEFAULT_QUERY_LIMIT,
            id: None,
            email: None,
            is_admin: None,
            asc: false,
        }
    }
}

impl UsersQuery {
    pub fn filter(&self) -> UserFilter {
        UserFilter {
            id: self.id,
            email: self.email.clone().filter(|e| !e.is_empty()),
            is_admin: self.is_admin,
            asc: self.asc,
        }
    }
}

/// Reject blank emails and passwords before they reach the database.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}
