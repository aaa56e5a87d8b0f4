//! SQL executor trait definition

use crate::error::DbResult;

/// A result row with every column rendered as a string (`"null"` for NULL).
pub type Row = Vec<String>;

/// Synchronous SQL executor used by the migration engine.
///
/// One executor owns one connection. Methods take `&mut self` because
/// [`reconnect`](SqlExecutor::reconnect) replaces that connection; the engine
/// passes the executor explicitly into each phase.
pub trait SqlExecutor {
    /// Discard the current connection and open a fresh one.
    fn reconnect(&mut self) -> DbResult<()>;

    /// Execute one or more statements in auto-commit mode.
    fn execute_batch(&mut self, sql: &str) -> DbResult<()>;

    /// Execute one or more statements inside `BEGIN` / `COMMIT`, rolling back
    /// if any statement or the commit fails.
    fn execute_in_transaction(&mut self, sql: &str) -> DbResult<()>;

    /// Run a query and return all rows.
    fn query(&mut self, sql: &str) -> DbResult<Vec<Row>>;

    /// Check whether a table exists in the default schema.
    fn table_exists(&mut self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
