//! Version identifiers and their total order.
//!
//! A version is a fixed-width `YYMMDDTHHMMSS` stamp. Three values sit outside
//! the normal range: [`Version::None`] (nothing installed), [`Version::Init`]
//! (the baseline migration) and [`Version::Dev`] (a development-only
//! migration that production runs never see).

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Persisted form of [`Version::None`].
pub const NULL_LITERAL: &str = "null";

/// Raw stamp of the baseline migration.
pub const INIT_RAW: &str = "000000T000000";

/// Raw stamp of the development-only migration.
pub const DEV_RAW: &str = "991231T235959";

/// Width of a raw version stamp.
pub const VERSION_WIDTH: usize = 13;

/// A schema version.
///
/// Ordering: `None < Init < Tagged(..) < Dev`, with tagged versions compared
/// by their raw stamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// No migrations installed
    None,
    /// Baseline migration (`000000T000000`)
    Init,
    /// Regular migration stamp
    Tagged(String),
    /// Development-only migration (`991231T235959`)
    Dev,
}

impl Version {
    /// Parse a persisted or directory-level version: a raw stamp or `null`.
    pub fn parse(value: &str) -> CoreResult<Self> {
        let value = value.trim();
        if value == NULL_LITERAL {
            return Ok(Version::None);
        }
        Self::parse_raw(value)
    }

    /// Parse operator input, which additionally accepts the `init` and `dev`
    /// aliases.
    pub fn parse_alias(value: &str) -> CoreResult<Self> {
        match value.trim() {
            "init" => Ok(Version::Init),
            "dev" => Ok(Version::Dev),
            other => Self::parse(other),
        }
    }

    /// Parse a raw `YYMMDDTHHMMSS` stamp.
    pub fn parse_raw(value: &str) -> CoreResult<Self> {
        if !is_valid_raw(value) {
            return Err(CoreError::InvalidVersion {
                value: value.to_string(),
            });
        }
        match value {
            INIT_RAW => Ok(Version::Init),
            DEV_RAW => Ok(Version::Dev),
            // Lexicographic order must stay chronological, so nothing may
            // sort above the dev stamp.
            raw if raw > DEV_RAW => Err(CoreError::InvalidVersion {
                value: value.to_string(),
            }),
            raw => Ok(Version::Tagged(raw.to_string())),
        }
    }

    /// The persisted string form.
    pub fn as_str(&self) -> &str {
        match self {
            Version::None => NULL_LITERAL,
            Version::Init => INIT_RAW,
            Version::Tagged(raw) => raw,
            Version::Dev => DEV_RAW,
        }
    }

    /// `true` for [`Version::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Version::None)
    }

    /// `true` for the baseline migration.
    pub fn is_init(&self) -> bool {
        matches!(self, Version::Init)
    }

    /// Display label used in place of a migration code for sentinels.
    pub fn sentinel_label(&self) -> Option<&'static str> {
        match self {
            Version::None => Some("(null)"),
            Version::Init => Some("(init)"),
            Version::Dev => Some("(dev)"),
            Version::Tagged(_) => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Version::None => 0,
            Version::Init => 1,
            Version::Tagged(_) => 2,
            Version::Dev => 3,
        }
    }
}

/// Direction of a transition between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply migrations (`up` scripts)
    Up,
    /// Revert migrations (`down` scripts)
    Down,
}

impl Direction {
    /// Direction needed to go from `from` to `to`, or `None` when they are
    /// equal.
    pub fn between(from: &Version, to: &Version) -> Option<Self> {
        match to.cmp(from) {
            Ordering::Greater => Some(Direction::Up),
            Ordering::Less => Some(Direction::Down),
            Ordering::Equal => None,
        }
    }

    /// Lowercase name, also the script suffix (`up.sql` / `down.sql`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_valid_raw(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == VERSION_WIDTH
        && bytes[..6].iter().all(u8::is_ascii_digit)
        && bytes[6] == b'T'
        && bytes[7..].iter().all(u8::is_ascii_digit)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Version::Tagged(a), Version::Tagged(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_alias(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
