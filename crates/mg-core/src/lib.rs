//! mg-core - Core library for migrate
//!
//! This crate provides the version model, migration entities, registry
//! discovery from disk, the plan builder, and configuration parsing shared by
//! the engine and the CLI.

pub mod config;
pub mod error;
pub mod migration;
pub mod migration_code;
pub mod plan;
pub mod registry;
pub mod target;
pub mod version;

pub use config::{Config, DatabaseConfig, RetryConfig};
pub use error::{CoreError, CoreResult};
pub use migration::{Migration, Part, ScriptRef};
pub use migration_code::MigrationCode;
pub use plan::{build_plan, Plan, Step};
pub use registry::Registry;
pub use target::{resolve_target, Target};
pub use version::{Direction, Version};
