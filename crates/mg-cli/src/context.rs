//! Runtime context for CLI commands

use anyhow::{Context, Result};
use mg_core::{Config, Registry};
use mg_db::DuckDbExecutor;
use mg_engine::{Confirm, ExecutorSettings, Migrator};

use crate::cli::GlobalArgs;

/// Configuration and migrations loaded for one invocation.
///
/// Everything here is resolved before the database is opened, so a broken
/// config or migrations directory fails without touching the database.
pub struct RuntimeContext {
    /// Loaded configuration
    pub config: Config,

    /// Migrations visible to this run
    pub registry: Registry,

    /// Resolved database path or `:memory:`
    pub database_path: String,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let root = &args.project_dir;

        let config = if let Some(config_path) = &args.config {
            Config::load(config_path).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(root).context("Failed to load project configuration")?
        };

        let include_dev = config.resolve_include_dev(args.dev);
        let migrations_dir = config.migrations_path_absolute(root);
        let registry = Registry::discover(&migrations_dir, include_dev).with_context(|| {
            format!("Failed to load migrations from {}", migrations_dir.display())
        })?;
        log::debug!(
            "Loaded {} migration(s) from {} (dev {})",
            registry.len(),
            migrations_dir.display(),
            if include_dev { "included" } else { "excluded" }
        );

        let database_path = config.database_path(root, args.database.as_deref());

        Ok(Self {
            config,
            registry,
            database_path,
        })
    }

    /// Open the database and hand everything to a [`Migrator`].
    pub fn into_migrator<C: Confirm>(self, confirm: C) -> Result<Migrator<DuckDbExecutor, C>> {
        log::debug!("Opening database {}", self.database_path);
        let db = DuckDbExecutor::new(&self.database_path)
            .with_context(|| format!("Failed to connect to database {}", self.database_path))?;
        Ok(Migrator::new(
            db,
            confirm,
            self.registry,
            ExecutorSettings::from(&self.config.retry),
        ))
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
