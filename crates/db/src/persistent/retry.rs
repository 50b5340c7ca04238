//! Retrying of store operations that fail transiently.

use std::future::Future;

use tracing::warn;

use super::config::DbConfig;
use crate::errors::DbResult;

/// Runs `operation` until it succeeds, fails with an error that is not
/// [retryable](crate::errors::DbError::is_retryable), or has been retried
/// [`DbConfig::max_retry_count`] times.
pub async fn execute_with_retries<F, Fut, T>(config: &DbConfig, mut operation: F) -> DbResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    let mut retries = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && retries < config.max_retry_count() => {
                retries += 1;
                warn!(%err, %retries, "retrying store operation");

                tokio::time::sleep(config.backoff_period()).await;
            }
            Err(err) => return Err(err),
        }
    }
}
