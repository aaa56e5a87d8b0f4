//! Error types for mg-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction management error (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// Storage or network IO error (D004)
    #[error("[D004] Database IO error: {0}")]
    IoError(String),

    /// Statement interrupted or timed out (D005)
    #[error("[D005] Statement interrupted: {0}")]
    Interrupted(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Whether retrying the operation on a fresh connection may succeed.
    ///
    /// Connectivity, IO and interruption failures are transient; SQL errors
    /// (syntax, constraint, missing objects) are not and must never be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionError(_) | DbError::IoError(_) | DbError::Interrupted(_)
        )
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants for engine
        // failures, so classify by the error class prefix in the message.
        let msg = err.to_string();
        if msg.contains("IO Error") {
            DbError::IoError(msg)
        } else if msg.contains("INTERRUPT") || msg.contains("Interrupted") {
            DbError::Interrupted(msg)
        } else if msg.contains("Connection Error") || msg.contains("connection closed") {
            DbError::ConnectionError(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
