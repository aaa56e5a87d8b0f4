//! Migration entities: parts, script references, and the migration unit.

use crate::error::{CoreError, CoreResult};
use crate::migration_code::MigrationCode;
use crate::version::{Direction, Version};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Reference to a SQL script.
///
/// File references are produced by registry discovery; inline scripts let
/// embedders and tests build migrations without touching disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptRef {
    /// Script stored on disk
    File(PathBuf),
    /// Script held in memory under a display name
    Inline { name: String, sql: String },
}

impl ScriptRef {
    /// Build an inline script reference.
    pub fn inline(name: impl Into<String>, sql: impl Into<String>) -> Self {
        ScriptRef::Inline {
            name: name.into(),
            sql: sql.into(),
        }
    }

    /// Load the script text.
    ///
    /// Unreadable or blank scripts are rejected: executing an empty batch
    /// would silently record a transition that never happened.
    pub fn load(&self) -> CoreResult<String> {
        let sql = match self {
            ScriptRef::File(path) => std::fs::read_to_string(path).map_err(|e| {
                log::debug!("Cannot read {}: {}", path.display(), e);
                CoreError::EmptyScript {
                    path: path.display().to_string(),
                }
            })?,
            ScriptRef::Inline { sql, .. } => sql.clone(),
        };
        if sql.trim().is_empty() {
            return Err(CoreError::EmptyScript {
                path: self.describe(),
            });
        }
        Ok(sql)
    }

    /// Path or inline name, for messages.
    pub fn describe(&self) -> String {
        match self {
            ScriptRef::File(path) => path.display().to_string(),
            ScriptRef::Inline { name, .. } => name.clone(),
        }
    }
}

/// One numbered part of a migration: a matched up/down script pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub up: ScriptRef,
    pub down: ScriptRef,
}

impl Part {
    pub fn new(up: ScriptRef, down: ScriptRef) -> Self {
        Self { up, down }
    }

    /// The script to run for `direction`.
    pub fn script(&self, direction: Direction) -> &ScriptRef {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }
}

/// A migration unit identified by its version.
///
/// Parts are numbered contiguously from 1. The baseline (`Init`) migration
/// has exactly one part and no state probe; every other migration carries a
/// state probe script whose single scalar result is the number of parts
/// currently installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub version: Version,
    pub code: MigrationCode,
    parts: BTreeMap<u32, Part>,
    state: Option<ScriptRef>,
}

impl Migration {
    /// Build the baseline migration.
    pub fn baseline(code: MigrationCode, part: Part) -> Self {
        let mut parts = BTreeMap::new();
        parts.insert(1, part);
        Self {
            version: Version::Init,
            code,
            parts,
            state: None,
        }
    }

    /// Build a multi-part migration from parts listed in order (part 1 first).
    pub fn multi_part(
        version: Version,
        code: MigrationCode,
        state: ScriptRef,
        parts: Vec<Part>,
    ) -> CoreResult<Self> {
        if version.is_none() || version.is_init() {
            return Err(CoreError::InvalidMigrationDirectory {
                path: format!("{version}-{code}"),
                reason: "only a regular or dev version may have numbered parts".to_string(),
            });
        }
        if parts.is_empty() {
            return Err(CoreError::InvalidMigrationDirectory {
                path: format!("{version}-{code}"),
                reason: "no N.up.sql / N.down.sql pairs found".to_string(),
            });
        }
        let parts = parts
            .into_iter()
            .enumerate()
            .map(|(i, part)| (i as u32 + 1, part))
            .collect();
        Ok(Self {
            version,
            code,
            parts,
            state: Some(state),
        })
    }

    /// `true` for the single-part baseline migration.
    pub fn is_baseline(&self) -> bool {
        self.version.is_init()
    }

    /// Highest part number, i.e. the installed state once fully applied.
    pub fn max_part(&self) -> u32 {
        self.parts.keys().next_back().copied().unwrap_or(0)
    }

    /// Number of parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Look up a part by number.
    pub fn part(&self, number: u32) -> Option<&Part> {
        self.parts.get(&number)
    }

    /// Part numbers in ascending order.
    pub fn part_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.parts.keys().copied()
    }

    /// State probe script, absent for the baseline migration.
    pub fn state_script(&self) -> Option<&ScriptRef> {
        self.state.as_ref()
    }

    /// Code shown in reports: the sentinel label for `init`/`dev`, the
    /// directory code otherwise.
    pub fn display_code(&self) -> String {
        match self.version.sentinel_label() {
            Some(label) => label.to_string(),
            None => self.code.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
