//! Version and history ledger.
//!
//! The installed version lives in a single-row table and every completed
//! step appends one history row. Both tables live in the target database and
//! are created on first write.

use crate::error::{EngineError, EngineResult};
use crate::retry::{with_retry, RetryPolicy, LEDGER_ATTEMPTS, READ_ATTEMPTS};
use chrono::{NaiveDateTime, Utc};
use mg_core::Version;
use mg_db::{quote_literal, SqlExecutor};
use serde::Serialize;
use std::time::Duration;

/// Single-row table holding the installed version.
pub const VERSION_TABLE: &str = "_migrate_version";

/// Append-only transition log.
pub const HISTORY_TABLE: &str = "_migrate_history";

/// Rows shown by `history` when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One recorded transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub date: NaiveDateTime,
    pub from: Version,
    pub to: Version,
}

/// Reads and writes the persisted version and history.
#[derive(Debug, Clone)]
pub struct Ledger {
    read: RetryPolicy,
    write: RetryPolicy,
}

impl Ledger {
    pub fn new(read_backoff: Duration, write_backoff: Duration) -> Self {
        Self {
            read: RetryPolicy::new(READ_ATTEMPTS, read_backoff),
            write: RetryPolicy::new(LEDGER_ATTEMPTS, write_backoff),
        }
    }

    /// The stored version, or [`Version::None`] when the table is missing or
    /// empty.
    ///
    /// Does not check the registry; see `Migrator::current_version`.
    pub fn read_version<E: SqlExecutor + ?Sized>(&self, db: &mut E) -> EngineResult<Version> {
        let rows = with_retry(db, &self.read, "read current version", |db| {
            if !db.table_exists(VERSION_TABLE)? {
                return Ok(Vec::new());
            }
            db.query(&format!("SELECT version FROM {VERSION_TABLE}"))
        })?;
        match rows.first().and_then(|row| row.first()) {
            Some(raw) => Ok(Version::parse(raw)?),
            None => Ok(Version::None),
        }
    }

    /// Replace the stored version. Writing [`Version::None`] leaves the
    /// table empty.
    pub fn write_version<E: SqlExecutor + ?Sized>(
        &self,
        db: &mut E,
        version: &Version,
    ) -> EngineResult<()> {
        let mut sql = format!("DELETE FROM {VERSION_TABLE};");
        if !version.is_none() {
            sql.push_str(&format!(
                "\nINSERT INTO {VERSION_TABLE} (version) VALUES ({});",
                quote_literal(version.as_str())
            ));
        }
        with_retry(db, &self.write, "update version", |db| {
            db.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {VERSION_TABLE} (
                     version CHAR(13) NOT NULL,
                     PRIMARY KEY (version)
                 )"
            ))?;
            db.execute_in_transaction(&sql)
        })?;
        log::debug!("Recorded version {version}");
        Ok(())
    }

    /// Append one `{from, to, now}` row.
    pub fn append_history<E: SqlExecutor + ?Sized>(
        &self,
        db: &mut E,
        from: &Version,
        to: &Version,
    ) -> EngineResult<()> {
        with_retry(db, &self.write, "update history", |db| {
            db.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {HISTORY_TABLE} (
                     date TIMESTAMP NOT NULL,
                     from_version CHAR(13) NOT NULL,
                     to_version CHAR(13) NOT NULL,
                     PRIMARY KEY (date)
                 )"
            ))?;
            // Stamped per attempt so a retry never collides with a row an
            // earlier attempt may have committed.
            let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S%.6f");
            db.execute_in_transaction(&format!(
                "INSERT INTO {HISTORY_TABLE} (date, from_version, to_version) VALUES (TIMESTAMP '{now}', {}, {});",
                quote_literal(from.as_str()),
                quote_literal(to.as_str())
            ))
        })?;
        log::debug!("Recorded history {from} -> {to}");
        Ok(())
    }

    /// The latest `limit` history rows, newest first.
    pub fn history<E: SqlExecutor + ?Sized>(
        &self,
        db: &mut E,
        limit: usize,
    ) -> EngineResult<Vec<HistoryEntry>> {
        let rows = with_retry(db, &self.read, "read history", |db| {
            if !db.table_exists(HISTORY_TABLE)? {
                return Ok(Vec::new());
            }
            db.query(&format!(
                "SELECT CAST(date AS VARCHAR), from_version, to_version
                 FROM {HISTORY_TABLE} ORDER BY date DESC LIMIT {limit}"
            ))
        })?;

        rows.iter()
            .map(|row| {
                let invalid = || EngineError::InvalidHistoryRow {
                    row: row.join(", "),
                };
                let [date, from, to] = row.as_slice() else {
                    return Err(invalid());
                };
                let date = NaiveDateTime::parse_from_str(date.trim(), TIMESTAMP_FORMAT)
                    .map_err(|_| invalid())?;
                Ok(HistoryEntry {
                    date,
                    from: Version::parse(from).map_err(|_| invalid())?,
                    to: Version::parse(to).map_err(|_| invalid())?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
