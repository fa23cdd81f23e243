//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("row not found")]
    NotFound,

    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The liveness probe never succeeded within its retry budget.
    #[error("database unavailable after {attempts} attempts")]
    Unavailable { attempts: u32 },
}

impl DbError {
    /// Classify a write error, turning unique violations into [`DbError::Conflict`].
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                DbError::Conflict(constraint)
            }
            other => DbError::Sqlx(other),
        }
    }
}
