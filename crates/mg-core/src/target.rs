//! Resolution of operator targets (`up`, `down`, `to <version>`) against the
//! registry and the currently installed version.

use crate::error::{CoreError, CoreResult};
use crate::registry::Registry;
use crate::version::Version;

/// What the operator asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Highest registered version
    Latest,
    /// Version immediately below the current one
    Previous,
    /// An explicit version (`null` allowed)
    Exact(Version),
}

/// Resolve `target` to a concrete version.
///
/// Returns `Ok(None)` when there is nothing to do. An explicit version that is
/// neither `null` nor registered is rejected here so the plan builder never
/// sees it.
pub fn resolve_target(
    registry: &Registry,
    current: &Version,
    target: &Target,
) -> CoreResult<Option<Version>> {
    match target {
        Target::Latest => {
            let latest = registry.latest();
            if latest.is_none() || *current >= latest {
                Ok(None)
            } else {
                Ok(Some(latest))
            }
        }
        Target::Previous => {
            if current.is_none() {
                return Ok(None);
            }
            registry
                .previous(current)
                .map(Some)
                .ok_or_else(|| CoreError::UnknownVersion {
                    version: current.to_string(),
                })
        }
        Target::Exact(version) => {
            if version == current {
                return Ok(None);
            }
            if !version.is_none() && !registry.contains(version) {
                return Err(CoreError::UnknownVersion {
                    version: version.to_string(),
                });
            }
            Ok(Some(version.clone()))
        }
    }
}

#[cfg(test)]
#[path = "target_test.rs"]
mod tests;
