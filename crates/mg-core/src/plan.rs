//! Plan building: the ordered steps that move the schema between versions.

use crate::migration::Migration;
use crate::registry::Registry;
use crate::version::{Direction, Version};
use std::collections::VecDeque;

/// One migration applied in one direction.
///
/// `from` / `to` are the ledger versions before and after the step, so the
/// history always records exact provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub version: Version,
    pub migration: Migration,
    pub direction: Direction,
    pub from: Version,
    pub to: Version,
}

/// Ordered, immutable sequence of steps between two versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    from: Version,
    to: Version,
    steps: Vec<Step>,
}

impl Plan {
    pub fn from_version(&self) -> &Version {
        &self.from
    }

    pub fn to_version(&self) -> &Version {
        &self.to
    }

    /// Direction of the whole plan, `None` for an empty plan.
    pub fn direction(&self) -> Option<Direction> {
        self.steps.first().map(|s| s.direction)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl IntoIterator for Plan {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Compute the steps needed to move from `from` to `to`.
///
/// Boundary versions are treated as already applied: `from` is never
/// re-applied on upgrade and `to` is never reverted on downgrade. Callers
/// must reject a `to` that is neither [`Version::None`] nor registered.
pub fn build_plan(registry: &Registry, from: &Version, to: &Version) -> Plan {
    let steps = match Direction::between(from, to) {
        None => Vec::new(),
        Some(Direction::Up) => upgrade_steps(registry, from, to),
        Some(Direction::Down) => downgrade_steps(registry, from, to),
    };
    Plan {
        from: from.clone(),
        to: to.clone(),
        steps,
    }
}

fn upgrade_steps(registry: &Registry, from: &Version, to: &Version) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut previous = from.clone();

    for (version, migration) in registry.iter() {
        if version <= from || version > to {
            continue;
        }
        steps.push(Step {
            version: version.clone(),
            migration: migration.clone(),
            direction: Direction::Up,
            from: previous,
            to: version.clone(),
        });
        previous = version.clone();
    }
    steps
}

fn downgrade_steps(registry: &Registry, from: &Version, to: &Version) -> Vec<Step> {
    let mut steps = VecDeque::new();
    // Resting version once the migration being visited is reverted.
    let mut next = Version::None;

    for (version, migration) in registry.iter() {
        if version > from {
            continue;
        }
        if !to.is_none() && version <= to {
            next = version.clone();
            continue;
        }
        steps.push_front(Step {
            version: version.clone(),
            migration: migration.clone(),
            direction: Direction::Down,
            from: version.clone(),
            to: next,
        });
        next = version.clone();
    }
    steps.into()
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
