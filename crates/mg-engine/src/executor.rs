//! Step executor.
//!
//! Applies one [`Step`] to the database. The baseline migration runs its
//! single script as one transaction. Multi-part migrations are driven by
//! their state probe: the executor never counts parts in memory, it asks the
//! database how many are installed and applies the next one, so a re-run
//! after a crash picks up after the last committed part.

use crate::confirm::Confirm;
use crate::error::{EngineError, EngineResult};
use crate::ledger::Ledger;
use crate::retry::{
    self, with_retry, Attempt, RetryPolicy, BASELINE_ATTEMPTS, MULTI_PART_EXTRA_ATTEMPTS,
    READ_ATTEMPTS,
};
use mg_core::{Direction, RetryConfig, Step, Version};
use mg_db::{Row, SqlExecutor};
use serde::Serialize;
use std::time::Duration;

/// Value a state probe returns when it cannot tell what is installed.
const UNKNOWN_STATE: i64 = -1;

/// Backoffs used by the executor and its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorSettings {
    /// Wait between read attempts (state probes, version reads)
    pub read_backoff: Duration,
    /// Wait between script and ledger write attempts
    pub write_backoff: Duration,
}

impl ExecutorSettings {
    /// No waiting between attempts.
    pub fn immediate() -> Self {
        Self {
            read_backoff: Duration::ZERO,
            write_backoff: Duration::ZERO,
        }
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for ExecutorSettings {
    fn from(config: &RetryConfig) -> Self {
        Self {
            read_backoff: config.read_backoff(),
            write_backoff: config.write_backoff(),
        }
    }
}

/// Result of one applied step.
///
/// The schema change has always been committed when an outcome is returned;
/// the two flags report whether the ledger caught up with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub version: Version,
    pub direction: Direction,
    pub from: Version,
    pub to: Version,
    pub version_recorded: bool,
    pub history_recorded: bool,
}

impl StepOutcome {
    /// `true` when both ledger writes succeeded.
    pub fn is_recorded(&self) -> bool {
        self.version_recorded && self.history_recorded
    }
}

/// Applies steps and records them in the ledger.
#[derive(Debug, Clone)]
pub struct StepExecutor {
    settings: ExecutorSettings,
    ledger: Ledger,
}

impl StepExecutor {
    pub fn new(settings: ExecutorSettings) -> Self {
        Self {
            settings,
            ledger: Ledger::new(settings.read_backoff, settings.write_backoff),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Apply `step`, then record the new version and a history row.
    ///
    /// Any error means the run must stop. Parts committed before the error
    /// stay committed; the next run resumes from the probed state.
    pub fn execute<E, C>(
        &self,
        db: &mut E,
        confirm: &mut C,
        step: &Step,
    ) -> EngineResult<StepOutcome>
    where
        E: SqlExecutor + ?Sized,
        C: Confirm + ?Sized,
    {
        log::info!(
            "{} {} {}:",
            step.direction,
            step.version,
            step.migration.display_code()
        );

        if step.migration.is_baseline() {
            self.apply_baseline(db, step)?;
        } else {
            self.apply_parts(db, confirm, step)?;
        }

        Ok(self.record(db, step))
    }

    fn apply_baseline<E: SqlExecutor + ?Sized>(&self, db: &mut E, step: &Step) -> EngineResult<()> {
        let part = step
            .migration
            .part(1)
            .ok_or_else(|| EngineError::MissingPart {
                version: step.version.to_string(),
                part: 1,
            })?;
        let sql = part.script(step.direction).load()?;

        let policy = RetryPolicy::new(BASELINE_ATTEMPTS, self.settings.write_backoff);
        let mut attempt = 0;
        with_retry(db, &policy, &format!("{} {}", step.direction, step.version), |db| {
            attempt += 1;
            log::info!("- attempt #{attempt}: applying ...");
            db.execute_in_transaction(&sql)
        })?;
        log::info!("ok");
        Ok(())
    }

    fn apply_parts<E, C>(&self, db: &mut E, confirm: &mut C, step: &Step) -> EngineResult<()>
    where
        E: SqlExecutor + ?Sized,
        C: Confirm + ?Sized,
    {
        let migration = &step.migration;
        let probe = migration
            .state_script()
            .ok_or_else(|| EngineError::MissingStateScript {
                version: step.version.to_string(),
            })?
            .load()?;
        let max = migration.max_part();
        let (initial, terminal) = match step.direction {
            Direction::Up => (0, max),
            Direction::Down => (max, 0),
        };

        log::info!("- checking init state ...");
        let state = self.probe(db, step, &probe)?;
        if state == initial {
            log::info!("ok");
        } else {
            log::warn!("!! not an init state (state #{state}, expected #{initial})");
            if !confirm.confirm("continue (y/n)?") {
                return Err(EngineError::Aborted {
                    version: step.version.to_string(),
                });
            }
        }

        let policy = RetryPolicy::new(
            MULTI_PART_EXTRA_ATTEMPTS + migration.part_count() as u32,
            self.settings.write_backoff,
        );
        let mut reconnect = false;
        for n in 1..=policy.attempts {
            let state = self.probe(db, step, &probe)?;
            if state == terminal {
                break;
            }
            let number = match step.direction {
                Direction::Up => state + 1,
                Direction::Down => state,
            };
            let sql = migration
                .part(number)
                .ok_or_else(|| EngineError::MissingPart {
                    version: step.version.to_string(),
                    part: number,
                })?
                .script(step.direction)
                .load()?;

            log::info!(
                "- attempt #{n}, state #{state}: {} part #{number} ...",
                step.direction
            );
            match retry::attempt(db, reconnect, |db| db.execute_in_transaction(&sql))? {
                Attempt::Done(()) => {
                    log::info!("ok");
                    reconnect = false;
                }
                Attempt::Transient(err) => {
                    policy.backoff_after(n, &err);
                    reconnect = true;
                }
            }
        }

        log::info!("- checking finish state ...");
        let state = self.probe(db, step, &probe)?;
        if state != terminal {
            return Err(EngineError::InvalidFinishState {
                version: step.version.to_string(),
                expected: terminal,
                actual: i64::from(state),
            });
        }
        log::info!("ok");
        Ok(())
    }

    /// Run the state probe and validate its result against the migration.
    fn probe<E: SqlExecutor + ?Sized>(&self, db: &mut E, step: &Step, sql: &str) -> EngineResult<u32> {
        let policy = RetryPolicy::new(READ_ATTEMPTS, self.settings.read_backoff);
        let rows = with_retry(db, &policy, &format!("read state of {}", step.version), |db| {
            db.query(sql)
        })?;
        parse_state(&step.version, &rows, step.migration.max_part())
    }

    /// Write the version and history rows. Failures are logged and reported
    /// in the outcome; the schema change itself is already committed.
    fn record<E: SqlExecutor + ?Sized>(&self, db: &mut E, step: &Step) -> StepOutcome {
        let version_recorded = match self.ledger.write_version(db, &step.to) {
            Ok(()) => true,
            Err(e) => {
                log::error!("!! failed to record version {}: {e}", step.to);
                false
            }
        };
        let history_recorded = match self.ledger.append_history(db, &step.from, &step.to) {
            Ok(()) => true,
            Err(e) => {
                log::error!("!! failed to record history {} -> {}: {e}", step.from, step.to);
                false
            }
        };
        StepOutcome {
            version: step.version.clone(),
            direction: step.direction,
            from: step.from.clone(),
            to: step.to.clone(),
            version_recorded,
            history_recorded,
        }
    }
}

/// Interpret state probe rows: exactly one row whose first column is an
/// integer in `0..=max`.
pub fn parse_state(version: &Version, rows: &[Row], max: u32) -> EngineResult<u32> {
    let [row] = rows else {
        return Err(EngineError::InvalidStateRows {
            version: version.to_string(),
            count: rows.len(),
        });
    };
    let raw = row.first().map(String::as_str).unwrap_or_default().trim();
    let state = parse_whole_number(raw).ok_or_else(|| EngineError::InvalidState {
        version: version.to_string(),
        value: raw.to_string(),
    })?;
    if state == UNKNOWN_STATE {
        return Err(EngineError::UnknownState {
            version: version.to_string(),
        });
    }
    match u32::try_from(state) {
        Ok(state) if state <= max => Ok(state),
        _ => Err(EngineError::StateOutOfRange {
            version: version.to_string(),
            state,
            max,
        }),
    }
}

/// Integers, and decimals with no fractional part such as `2.0`.
fn parse_whole_number(raw: &str) -> Option<i64> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
