//! Retryable database operations.
//!
//! Every phase that touches the database (reads, script application, ledger
//! writes) runs through [`attempt`] so transient failures are handled the
//! same way everywhere: the connection is reopened before a retry, transient
//! errors are reported with the backoff that follows, and anything else is
//! fatal immediately.

use crate::error::{EngineError, EngineResult};
use mg_db::{DbError, DbResult, SqlExecutor};
use std::time::Duration;

/// Attempts for reads (current version, history, state probes).
pub const READ_ATTEMPTS: u32 = 3;

/// Attempts for ledger writes.
pub const LEDGER_ATTEMPTS: u32 = 3;

/// Attempts for applying the baseline migration.
pub const BASELINE_ATTEMPTS: u32 = 5;

/// Attempts for a multi-part migration on top of one per part: the initial
/// probe, the final probe, and one spare retry.
pub const MULTI_PART_EXTRA_ATTEMPTS: u32 = 3;

/// Attempt budget and fixed backoff for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(attempts: u32, backoff: Duration) -> Self {
        Self { attempts, backoff }
    }

    /// Log a transient failure and sleep for the backoff if attempt
    /// `attempt` was not the last one.
    pub fn backoff_after(&self, attempt: u32, err: &DbError) {
        log::warn!("!! {err}");
        if attempt >= self.attempts {
            return;
        }
        log::warn!("retrying in {}s ...", self.backoff.as_secs_f64());
        if !self.backoff.is_zero() {
            std::thread::sleep(self.backoff);
        }
    }
}

/// Outcome of a single attempt that did not fail fatally.
#[derive(Debug)]
pub enum Attempt<T> {
    Done(T),
    Transient(DbError),
}

/// Run `op` once, reopening the connection first when `reconnect` is set.
///
/// Non-transient database errors are returned as [`EngineError::Database`].
pub fn attempt<E, T, F>(db: &mut E, reconnect: bool, op: F) -> EngineResult<Attempt<T>>
where
    E: SqlExecutor + ?Sized,
    F: FnOnce(&mut E) -> DbResult<T>,
{
    if reconnect {
        if let Err(e) = db.reconnect() {
            return classify(e);
        }
    }
    match op(db) {
        Ok(value) => Ok(Attempt::Done(value)),
        Err(e) => classify(e),
    }
}

fn classify<T>(err: DbError) -> EngineResult<Attempt<T>> {
    if err.is_transient() {
        Ok(Attempt::Transient(err))
    } else {
        Err(EngineError::Database(err))
    }
}

/// Run `op` until it succeeds, a non-transient error occurs, or the policy's
/// attempts run out.
///
/// The first attempt reuses the current connection; every retry reconnects.
pub fn with_retry<E, T, F>(
    db: &mut E,
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> EngineResult<T>
where
    E: SqlExecutor + ?Sized,
    F: FnMut(&mut E) -> DbResult<T>,
{
    let mut last_error = None;
    for n in 1..=policy.attempts {
        match attempt(db, n > 1, &mut op)? {
            Attempt::Done(value) => return Ok(value),
            Attempt::Transient(err) => {
                policy.backoff_after(n, &err);
                last_error = Some(err);
            }
        }
    }
    Err(EngineError::AttemptsExhausted {
        operation: operation.to_string(),
        attempts: policy.attempts,
        source: last_error
            .unwrap_or_else(|| DbError::ConnectionError("no attempts were made".to_string())),
    })
}

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;
