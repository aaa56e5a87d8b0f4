//! mg-db - Database layer for migrate
//!
//! This crate provides the synchronous [`SqlExecutor`] trait the migration
//! engine talks to, and its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub(crate) mod row_helpers;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod traits;

pub use duckdb::{quote_literal, DuckDbExecutor};
pub use error::{DbError, DbResult};
pub use traits::{Row, SqlExecutor};
