//! Postgres connection pool, readiness gate and migrations.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::probe::retry_until_ready;
use crate::DbError;

/// Type alias for the shared Postgres pool used across the whole application.
pub type DbPool = PgPool;

/// Create a new connection pool from the given `database_url`.
///
/// `max_connections` controls the pool ceiling.  Connections are opened
/// lazily, so this succeeds even while the server is still starting; use
/// [`wait_for_database`] before relying on it.
pub fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, DbError> {
    info!("Creating database pool (max_connections={})", max_connections);
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(database_url)?;
    Ok(pool)
}

/// Issue a single `SELECT 1` against the pool.
pub async fn ping(pool: &DbPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Block until the database answers a liveness probe.
///
/// The probe is retried up to `retries` times with `interval` between
/// attempts. Returns [`DbError::Unavailable`] once the budget is spent.
pub async fn wait_for_database(
    pool: &DbPool,
    retries: u32,
    interval: Duration,
) -> Result<(), DbError> {
    retry_until_ready(retries, interval, |attempt| async move {
        match ping(pool).await {
            Ok(()) => true,
            Err(e) => {
                warn!(attempt, retries, "database not ready: {e}");
                false
            }
        }
    })
    .await?;
    info!("Database is ready");
    Ok(())
}

/// Run embedded SQLx migrations located in `./migrations` (relative to the
/// workspace root at build time).
///
/// Already-applied revisions are skipped, so calling this on an up-to-date
/// database is a no-op.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    info!("Running database migrations");
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
