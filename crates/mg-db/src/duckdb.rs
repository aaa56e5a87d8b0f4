//! DuckDB executor implementation

use crate::error::{DbError, DbResult};
use crate::row_helpers::collect_rows;
use crate::traits::{Row, SqlExecutor};
use duckdb::Connection;
use std::path::Path;

const MEMORY_PATH: &str = ":memory:";

/// DuckDB-backed [`SqlExecutor`].
///
/// Single-threaded: the engine applies one batch at a time, so the
/// connection is owned directly rather than behind a `Mutex`.
pub struct DuckDbExecutor {
    path: String,
    conn: Option<Connection>,
}

impl DuckDbExecutor {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        Self::new(MEMORY_PATH)
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        Self::new(&path.display().to_string())
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        let conn = open(path)?;
        Ok(Self {
            path: path.to_string(),
            conn: Some(conn),
        })
    }

    /// Path this executor connects to.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn is_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }

    /// Borrow the live connection, reopening it if a previous reconnect
    /// attempt left none.
    fn conn(&mut self) -> DbResult<&Connection> {
        if self.conn.is_none() {
            self.conn = Some(open(&self.path)?);
        }
        self.conn
            .as_ref()
            .ok_or_else(|| DbError::ConnectionError(format!("no connection to {}", self.path)))
    }
}

fn open(path: &str) -> DbResult<Connection> {
    let result = if path == MEMORY_PATH {
        Connection::open_in_memory()
    } else {
        Connection::open(Path::new(path))
    };
    result.map_err(|e| DbError::ConnectionError(format!("{e}: {path}")))
}

/// Escape a value for use inside a single-quoted SQL literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl SqlExecutor for DuckDbExecutor {
    fn reconnect(&mut self) -> DbResult<()> {
        if self.is_memory() {
            // Reopening an in-memory database would discard its contents.
            log::debug!("Keeping in-memory DuckDB connection");
            return Ok(());
        }
        log::debug!("Reconnecting to {}", self.path);
        self.conn = None;
        self.conn = Some(open(&self.path)?);
        Ok(())
    }

    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }

    fn execute_in_transaction(&mut self, sql: &str) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        if let Err(e) = conn.execute_batch(sql) {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(e.into());
        }

        if let Err(commit_err) = conn.execute_batch("COMMIT") {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(match DbError::from(commit_err) {
                DbError::ExecutionError(msg) => {
                    DbError::TransactionError(format!("COMMIT failed: {msg}"))
                }
                transient => transient,
            });
        }
        Ok(())
    }

    fn query(&mut self, sql: &str) -> DbResult<Vec<Row>> {
        collect_rows(self.conn()?, sql)
    }

    fn table_exists(&mut self, name: &str) -> DbResult<bool> {
        // Handle schema-qualified names
        let (schema, table) = match name.rsplit_once('.') {
            Some((schema, table)) => (schema, table),
            None => ("main", name),
        };
        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = {} AND table_name = {}",
            quote_literal(schema),
            quote_literal(table)
        );
        let count: i64 = self.conn()?.query_row(&sql, [], |row| row.get(0))?;
        Ok(count > 0)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
