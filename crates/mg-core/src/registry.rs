//! Migration registry: discovery and validation of migration directories.
//!
//! A migrations directory contains one sub-directory per migration, named
//! `<version>-<code>`. The baseline directory holds `up.sql` and `down.sql`;
//! every other directory holds `state.sql` plus numbered `N.up.sql` /
//! `N.down.sql` pairs. All validation happens here, before any database work.

use crate::error::{CoreError, CoreResult};
use crate::migration::{Migration, Part, ScriptRef};
use crate::migration_code::MigrationCode;
use crate::version::Version;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Scripts of this size or smaller are treated as placeholders and rejected.
pub const MIN_SCRIPT_BYTES: u64 = 32;

const UP_SUFFIX: &str = ".up.sql";
const DOWN_SUFFIX: &str = ".down.sql";
const STATE_FILE: &str = "state.sql";

/// Version-ordered set of available migrations for one run.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    migrations: BTreeMap<Version, Migration>,
    include_dev: bool,
}

impl Registry {
    /// Discover migrations under `dir`.
    ///
    /// The dev migration is skipped entirely unless `include_dev` is set.
    pub fn discover(dir: &Path, include_dev: bool) -> CoreResult<Self> {
        if !dir.is_dir() {
            return Err(CoreError::MigrationsDirNotFound {
                path: dir.display().to_string(),
            });
        }

        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| CoreError::IoWithPath {
                path: dir.display().to_string(),
                source: e,
            })?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(|e| CoreError::IoWithPath {
                path: dir.display().to_string(),
                source: e,
            })?;
        entries.sort();

        let mut migrations = Vec::new();
        for path in entries {
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                return Err(invalid_dir(&path, "directory name is not valid UTF-8"));
            };
            if name.starts_with('.') {
                continue;
            }

            let (version, code) = parse_dir_name(&path, name)?;
            if version == Version::Dev && !include_dev {
                log::debug!("Skipping dev migration {}", path.display());
                continue;
            }

            let migration = if version.is_init() {
                load_baseline(&path, code)?
            } else {
                load_multi_part(&path, version, code)?
            };
            migrations.push((path, migration));
        }

        let mut registry = Self {
            migrations: BTreeMap::new(),
            include_dev,
        };
        let mut origins: BTreeMap<Version, PathBuf> = BTreeMap::new();
        for (path, migration) in migrations {
            if let Some(first) = origins.get(&migration.version) {
                return Err(CoreError::DuplicateVersion {
                    version: migration.version.to_string(),
                    first: first.display().to_string(),
                    second: path.display().to_string(),
                });
            }
            origins.insert(migration.version.clone(), path);
            registry.migrations.insert(migration.version.clone(), migration);
        }
        Ok(registry)
    }

    /// Build a registry from already constructed migrations.
    pub fn from_migrations(
        migrations: impl IntoIterator<Item = Migration>,
        include_dev: bool,
    ) -> CoreResult<Self> {
        let mut map: BTreeMap<Version, Migration> = BTreeMap::new();
        for migration in migrations {
            if migration.version.is_none() {
                return Err(CoreError::InvalidMigrationDirectory {
                    path: migration.code.to_string(),
                    reason: "the null version cannot be registered".to_string(),
                });
            }
            if migration.version == Version::Dev && !include_dev {
                continue;
            }
            match map.entry(migration.version.clone()) {
                Entry::Occupied(slot) => {
                    return Err(CoreError::DuplicateVersion {
                        version: migration.version.to_string(),
                        first: slot.get().code.to_string(),
                        second: migration.code.to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(migration);
                }
            }
        }
        Ok(Self {
            migrations: map,
            include_dev,
        })
    }

    /// Whether the dev migration was considered during discovery.
    pub fn includes_dev(&self) -> bool {
        self.include_dev
    }

    pub fn get(&self, version: &Version) -> Option<&Migration> {
        self.migrations.get(version)
    }

    /// `true` when `version` is a registered migration. Never true for
    /// [`Version::None`].
    pub fn contains(&self, version: &Version) -> bool {
        self.migrations.contains_key(version)
    }

    /// Migrations in ascending version order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Version, &Migration)> {
        self.migrations.iter()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Highest registered version, or [`Version::None`] for an empty registry.
    pub fn latest(&self) -> Version {
        self.migrations
            .keys()
            .next_back()
            .cloned()
            .unwrap_or(Version::None)
    }

    /// The version immediately preceding `current` in `[None, registered...]`.
    ///
    /// Returns `None` when `current` is [`Version::None`] or not registered.
    pub fn previous(&self, current: &Version) -> Option<Version> {
        if !self.contains(current) {
            return None;
        }
        Some(
            self.migrations
                .range(..current.clone())
                .next_back()
                .map(|(v, _)| v.clone())
                .unwrap_or(Version::None),
        )
    }
}

fn invalid_dir(path: &Path, reason: impl Into<String>) -> CoreError {
    CoreError::InvalidMigrationDirectory {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Split `<version>-<code>` into its parts.
fn parse_dir_name(path: &Path, name: &str) -> CoreResult<(Version, MigrationCode)> {
    let Some((raw, code)) = name.split_once('-') else {
        return Err(invalid_dir(path, "expected '<version>-<code>'"));
    };
    let version = Version::parse_raw(raw).map_err(|e| invalid_dir(path, e.to_string()))?;
    let code = MigrationCode::try_new(code)
        .ok_or_else(|| invalid_dir(path, "migration code must not be empty"))?;
    Ok((version, code))
}

/// Check that a script exists, is a readable file, and is large enough to
/// hold real SQL.
fn validate_script(path: &Path) -> CoreResult<ScriptRef> {
    let valid = std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > MIN_SCRIPT_BYTES)
        .unwrap_or(false)
        && std::fs::File::open(path).is_ok();
    if !valid {
        return Err(CoreError::InvalidScript {
            path: path.display().to_string(),
        });
    }
    Ok(ScriptRef::File(path.to_path_buf()))
}

fn load_baseline(dir: &Path, code: MigrationCode) -> CoreResult<Migration> {
    let up = validate_script(&dir.join("up.sql"))?;
    let down = validate_script(&dir.join("down.sql"))?;
    Ok(Migration::baseline(code, Part::new(up, down)))
}

fn load_multi_part(dir: &Path, version: Version, code: MigrationCode) -> CoreResult<Migration> {
    let state = validate_script(&dir.join(STATE_FILE))?;

    let mut ups = BTreeSet::new();
    let mut downs = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(num) = name.strip_suffix(UP_SUFFIX) {
            ups.insert(parse_part_number(dir, num)?);
        } else if let Some(num) = name.strip_suffix(DOWN_SUFFIX) {
            downs.insert(parse_part_number(dir, num)?);
        }
    }

    if ups != downs {
        return Err(CoreError::MismatchedScripts {
            path: dir.display().to_string(),
        });
    }
    if ups.is_empty() {
        return Err(invalid_dir(dir, "no N.up.sql / N.down.sql pairs found"));
    }
    if !ups.iter().copied().eq(1..=ups.len() as u32) {
        return Err(invalid_dir(
            dir,
            "part numbering must be contiguous starting at 1",
        ));
    }

    let parts = ups
        .iter()
        .map(|n| {
            let up = validate_script(&dir.join(format!("{n}{UP_SUFFIX}")))?;
            let down = validate_script(&dir.join(format!("{n}{DOWN_SUFFIX}")))?;
            Ok(Part::new(up, down))
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Migration::multi_part(version, code, state, parts)
}

fn parse_part_number(dir: &Path, num: &str) -> CoreResult<u32> {
    match num.parse::<u32>() {
        Ok(n) if n > 0 && !num.starts_with('0') => Ok(n),
        _ => Err(invalid_dir(
            dir,
            format!("invalid part number '{num}': expected a positive integer"),
        )),
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
