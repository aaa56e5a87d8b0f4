//! Error types for mg-core

use thiserror::Error;

/// Core error type for migrate
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Malformed version identifier
    #[error("[E003] Invalid version '{value}': expected YYMMDDTHHMMSS, 'null', 'init' or 'dev'")]
    InvalidVersion { value: String },

    /// E004: Migrations directory not found
    #[error("[E004] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// E005: Migration directory name or layout is malformed
    #[error("[E005] Invalid migration directory '{path}': {reason}")]
    InvalidMigrationDirectory { path: String, reason: String },

    /// E006: Up and down scripts do not pair up
    #[error("[E006] Invalid migration: different up/down at {path}")]
    MismatchedScripts { path: String },

    /// E007: Script file missing, unreadable or too small
    #[error("[E007] Invalid migration script: {path}")]
    InvalidScript { path: String },

    /// E008: Two directories declare the same version
    #[error("[E008] Duplicate migration version {version}: {first} and {second}")]
    DuplicateVersion {
        version: String,
        first: String,
        second: String,
    },

    /// E009: Script content could not be loaded at execution time
    #[error("[E009] Invalid sql: {path}")]
    EmptyScript { path: String },

    /// E010: Target version is not in the registry
    #[error("[E010] Selected version is unknown: {version}")]
    UnknownVersion { version: String },

    /// E011: IO error
    #[error("[E011] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E012: IO error with file path context
    #[error("[E012] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E013: YAML parse error
    #[error("[E013] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
