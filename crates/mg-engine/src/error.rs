//! Error types for mg-engine

use mg_core::CoreError;
use mg_db::DbError;
use thiserror::Error;

/// Engine errors. Every variant is fatal for the current run.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Registration, configuration or target error from mg-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Non-transient database error (X001)
    #[error("[X001] {0}")]
    Database(#[from] DbError),

    /// Transient failures outlasted the retry budget (X002)
    #[error("[X002] {operation}: no attempts left after {attempts} tries: {source}")]
    AttemptsExhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: DbError,
    },

    /// State probe returned other than exactly one row (X003)
    #[error("[X003] Invalid state result rows for {version}: expected 1, got {count}")]
    InvalidStateRows { version: String, count: usize },

    /// State probe returned a non-numeric value (X004)
    #[error("[X004] Invalid state for {version}: {value}")]
    InvalidState { version: String, value: String },

    /// State probe reported the unknown-state sentinel (X005)
    #[error("[X005] Unknown state for {version}")]
    UnknownState { version: String },

    /// State probe returned a value outside `0..=max` (X006)
    #[error("[X006] Incorrect state {state} for {version}: expected 0..={max}")]
    StateOutOfRange {
        version: String,
        state: i64,
        max: u32,
    },

    /// Final probe did not reach the terminal state (X007)
    #[error("[X007] Invalid finish state for {version}: expected {expected}, got {actual}")]
    InvalidFinishState {
        version: String,
        expected: u32,
        actual: i64,
    },

    /// Ledger holds a version the registry does not know (X008)
    #[error("[X008] Current version is unknown: {version}")]
    UnknownCurrentVersion { version: String },

    /// Operator declined to continue from an unexpected initial state (X009)
    #[error("[X009] Aborted: {version} is not in its initial state")]
    Aborted { version: String },

    /// Migration lacks a part the state machine needs (X010)
    #[error("[X010] Migration {version} has no part {part}")]
    MissingPart { version: String, part: u32 },

    /// Multi-part migration without a state probe (X011)
    #[error("[X011] Migration {version} has no state script")]
    MissingStateScript { version: String },

    /// History row could not be decoded (X012)
    #[error("[X012] Invalid history row: {row}")]
    InvalidHistoryRow { row: String },
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
