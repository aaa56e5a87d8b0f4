//! mg-engine - Migration engine for migrate
//!
//! Applies plans built by `mg-core` against a live database: one step at a
//! time, each script in its own transaction, with bounded retry on transient
//! failures. Multi-part migrations are driven by probing the database's
//! installed state, so a re-run after a crash resumes where the last
//! committed part left off.

pub mod confirm;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod migrator;
pub mod retry;

pub use confirm::{AutoConfirm, Confirm};
pub use error::{EngineError, EngineResult};
pub use executor::{ExecutorSettings, StepExecutor, StepOutcome};
pub use ledger::{HistoryEntry, Ledger, DEFAULT_HISTORY_LIMIT};
pub use migrator::{Migrator, RunSummary};
pub use retry::RetryPolicy;
