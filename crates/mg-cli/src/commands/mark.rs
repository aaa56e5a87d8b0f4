//! Mark command implementation

use anyhow::{Context, Result};
use mg_engine::AutoConfirm;

use crate::cli::{GlobalArgs, MarkArgs};
use crate::context::RuntimeContext;

/// Execute the mark command
pub fn execute(args: &MarkArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let mut migrator = ctx.into_migrator(AutoConfirm(false))?;
    migrator
        .mark_version(&args.version)
        .with_context(|| format!("Failed to mark version {}", args.version))
}

#[cfg(test)]
#[path = "mark_test.rs"]
mod tests;
