//! Strongly-typed migration code name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Human-readable code name of a migration, taken from the part of the
/// directory name after the version (`200101T000000-add_users` -> `add_users`).
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MigrationCode(String);

impl MigrationCode {
    /// Try to create a new `MigrationCode`, returning `None` if the name is
    /// empty or only whitespace.
    pub fn try_new(code: impl Into<String>) -> Option<Self> {
        let s = code.into();
        if s.trim().is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Return the underlying code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MigrationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for MigrationCode {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MigrationCode {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s).ok_or("MigrationCode must not be empty")
    }
}

impl From<MigrationCode> for String {
    fn from(code: MigrationCode) -> Self {
        code.0
    }
}

impl PartialEq<str> for MigrationCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
