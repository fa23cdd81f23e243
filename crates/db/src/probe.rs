//! Generic retry loop for liveness probes.

use std::future::Future;
use std::time::Duration;

use crate::DbError;

/// Call `probe` until it reports success or `retries` attempts have been made.
///
/// `probe` receives the 1-based attempt number. The loop sleeps `interval`
/// between failed attempts but not after the last one.
pub async fn retry_until_ready<F, Fut>(
    retries: u32,
    interval: Duration,
    mut probe: F,
) -> Result<u32, DbError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = bool>,
{
    let retries = retries.max(1);
    for attempt in 1..=retries {
        if probe(attempt).await {
            return Ok(attempt);
        }
        if attempt < retries {
            tokio::time::sleep(interval).await;
        }
    }
    Err(DbError::Unavailable { attempts: retries })
}
