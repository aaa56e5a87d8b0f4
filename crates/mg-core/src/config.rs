//! Configuration types and parsing for migrate.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file names probed in a project directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["migrate.yml", "migrate.yaml"];

/// Environment variable overriding the database path.
pub const DATABASE_ENV_VAR: &str = "MIGRATE_DATABASE";

/// Environment variable that enables the dev migration when set to `dev`.
pub const APP_ENV_VAR: &str = "APP_ENV";

/// In-memory DuckDB marker.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Project configuration from migrate.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directory holding the `<version>-<code>` migration directories
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,

    /// Include the dev migration in every run
    #[serde(default)]
    pub include_dev: bool,

    /// Backoff between retry attempts
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB database path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Retry backoff configuration.
///
/// Attempt counts are fixed per phase; only the waits are tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Wait before re-running a failed read, in seconds
    #[serde(default = "default_read_backoff_secs")]
    pub read_backoff_secs: u64,

    /// Wait before re-running a failed script or ledger write, in seconds
    #[serde(default = "default_write_backoff_secs")]
    pub write_backoff_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            read_backoff_secs: default_read_backoff_secs(),
            write_backoff_secs: default_write_backoff_secs(),
        }
    }
}

impl RetryConfig {
    pub fn read_backoff(&self) -> Duration {
        Duration::from_secs(self.read_backoff_secs)
    }

    pub fn write_backoff(&self) -> Duration {
        Duration::from_secs(self.write_backoff_secs)
    }
}

fn default_db_path() -> String {
    "migrate.duckdb".to_string()
}

fn default_migrations_path() -> String {
    ".".to_string()
}

fn default_read_backoff_secs() -> u64 {
    3
}

fn default_write_backoff_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            migrations_path: default_migrations_path(),
            include_dev: false,
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for migrate.yml or migrate.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        if self.migrations_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_path cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Absolute migrations directory for a project rooted at `root`
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        let path = Path::new(&self.migrations_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// Database path to open, with `override_path` taking precedence over the
    /// [`DATABASE_ENV_VAR`] environment variable and then the config file.
    ///
    /// Relative file paths are resolved against `root`; `:memory:` is passed
    /// through untouched.
    pub fn database_path(&self, root: &Path, override_path: Option<&str>) -> String {
        let raw = override_path
            .map(String::from)
            .or_else(|| std::env::var(DATABASE_ENV_VAR).ok())
            .unwrap_or_else(|| self.database.path.clone());
        if raw == MEMORY_DATABASE || Path::new(&raw).is_absolute() {
            raw
        } else {
            root.join(raw).display().to_string()
        }
    }

    /// Whether the dev migration is visible: the CLI flag, `APP_ENV=dev`, or
    /// `include_dev: true` each enable it.
    pub fn resolve_include_dev(&self, cli_flag: bool) -> bool {
        cli_flag
            || self.include_dev
            || std::env::var(APP_ENV_VAR).is_ok_and(|v| v == "dev")
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
