// ABOUTME: Retry helper for SQLite write transactions that hit lock contention
// ABOUTME: Backs off exponentially on busy/locked errors and gives up on anything else
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::{future::Future, time::Duration};

use tokio::time::sleep;
use tracing::warn;

/// Attempts made for a write transaction before giving up
pub const WRITE_ATTEMPTS: u32 = 4;

/// Run `f` until it succeeds, fails with a non-retryable error, or runs out of attempts
///
/// Backoff doubles from 10ms. Constraint violations and other errors are
/// returned immediately.
///
/// # Errors
///
/// Returns the last error from `f`
pub async fn retry_on_busy<F, Fut, T>(mut f: F, max_attempts: u32) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempts = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempts += 1;
                if attempts >= max_attempts || !is_busy(&e) {
                    return Err(e);
                }
                let backoff_ms = 10 * (1_u64 << attempts);
                warn!(
                    attempt = attempts,
                    backoff_ms,
                    error = %e,
                    "Write transaction hit lock contention, retrying"
                );
                sleep(Duration::from_millis(backoff_ms)).await;
            }
        }
    }
}

/// `SQLITE_BUSY` / `SQLITE_LOCKED` and pool acquisition timeouts
fn is_busy(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db) => {
            matches!(db.code().as_deref(), Some("5" | "6"))
                || db.message().contains("database is locked")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_pool_timeouts_are_retried() {
        let calls = AtomicU32::new(0);
        let result = retry_on_busy(
            || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(sqlx::Error::PoolTimedOut)
                } else {
                    Ok(7)
                }
            },
            WRITE_ATTEMPTS,
        )
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_other_errors_fail_fast() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_on_busy(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(sqlx::Error::RowNotFound)
            },
            WRITE_ATTEMPTS,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
