//! High-level migration facade.
//!
//! [`Migrator`] owns the database connection, the confirmation capability
//! and the registry for one run, and exposes the operations the CLI needs:
//! reading the current version and history, planning, applying steps, and
//! marking a version by hand.

use crate::confirm::Confirm;
use crate::error::{EngineError, EngineResult};
use crate::executor::{ExecutorSettings, StepExecutor, StepOutcome};
use crate::ledger::HistoryEntry;
use mg_core::{resolve_target, CoreError, Plan, Registry, Step, Target, Version};
use mg_db::SqlExecutor;
use serde::Serialize;

/// What a call to [`Migrator::migrate`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Version installed when the run started
    pub from: Version,
    /// Resolved target, `None` when there was nothing to do
    pub to: Option<Version>,
    /// One outcome per applied step, in order
    pub steps: Vec<StepOutcome>,
}

impl RunSummary {
    /// `true` when the run had nothing to apply.
    pub fn is_noop(&self) -> bool {
        self.to.is_none()
    }

    /// `true` when every applied step was recorded in the ledger.
    pub fn is_fully_recorded(&self) -> bool {
        self.steps.iter().all(StepOutcome::is_recorded)
    }
}

/// Runs plans against one database.
pub struct Migrator<E, C> {
    db: E,
    confirm: C,
    registry: Registry,
    executor: StepExecutor,
}

impl<E: SqlExecutor, C: Confirm> Migrator<E, C> {
    pub fn new(db: E, confirm: C, registry: Registry, settings: ExecutorSettings) -> Self {
        Self {
            db,
            confirm,
            registry,
            executor: StepExecutor::new(settings),
        }
    }

    /// Registered migrations, already filtered by the dev-inclusion policy.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn executor(&self) -> &StepExecutor {
        &self.executor
    }

    pub fn db_mut(&mut self) -> &mut E {
        &mut self.db
    }

    pub fn into_db(self) -> E {
        self.db
    }

    /// Installed version. A stored version the registry does not know is an
    /// error: the ledger and the migrations directory disagree.
    pub fn current_version(&mut self) -> EngineResult<Version> {
        let version = self.executor.ledger().read_version(&mut self.db)?;
        if !version.is_none() && !self.registry.contains(&version) {
            return Err(EngineError::UnknownCurrentVersion {
                version: version.to_string(),
            });
        }
        Ok(version)
    }

    /// Latest `limit` history entries, newest first.
    pub fn history(&mut self, limit: usize) -> EngineResult<Vec<HistoryEntry>> {
        self.executor.ledger().history(&mut self.db, limit)
    }

    /// Plan the transition `from -> to`. Both ends must be `null` or
    /// registered.
    pub fn build_plan(&self, from: &Version, to: &Version) -> EngineResult<Plan> {
        if !self.is_known(from) {
            return Err(EngineError::UnknownCurrentVersion {
                version: from.to_string(),
            });
        }
        if !self.is_known(to) {
            return Err(CoreError::UnknownVersion {
                version: to.to_string(),
            }
            .into());
        }
        Ok(mg_core::build_plan(&self.registry, from, to))
    }

    /// Apply one step and record it.
    pub fn execute_step(&mut self, step: &Step) -> EngineResult<StepOutcome> {
        self.executor.execute(&mut self.db, &mut self.confirm, step)
    }

    /// Set the installed version without running any script.
    pub fn mark_version(&mut self, version: &Version) -> EngineResult<()> {
        if !self.is_known(version) {
            return Err(CoreError::UnknownVersion {
                version: version.to_string(),
            }
            .into());
        }
        self.executor.ledger().write_version(&mut self.db, version)?;
        log::info!("ok");
        Ok(())
    }

    /// Resolve `target` against the current version and apply the resulting
    /// plan step by step, stopping at the first error.
    pub fn migrate(&mut self, target: &Target) -> EngineResult<RunSummary> {
        let from = self.current_version()?;
        let Some(to) = resolve_target(&self.registry, &from, target)? else {
            let verb = match target {
                Target::Latest => "upgrade",
                Target::Previous => "downgrade",
                Target::Exact(_) => "migrate",
            };
            log::info!("!! no versions are available to {verb}");
            return Ok(RunSummary {
                from,
                to: None,
                steps: Vec::new(),
            });
        };

        let plan = self.build_plan(&from, &to)?;
        log::debug!(
            "Planned {} step(s) from {} to {}",
            plan.len(),
            plan.from_version(),
            plan.to_version()
        );

        let mut steps = Vec::with_capacity(plan.len());
        for step in &plan {
            steps.push(self.execute_step(step)?);
        }
        Ok(RunSummary {
            from,
            to: Some(to),
            steps,
        })
    }

    fn is_known(&self, version: &Version) -> bool {
        version.is_none() || self.registry.contains(version)
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
