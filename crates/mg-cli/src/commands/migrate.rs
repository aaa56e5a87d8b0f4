//! Up, down and to command implementations

use anyhow::{Context, Result};
use mg_core::Target;
use mg_engine::{AutoConfirm, Confirm, RunSummary};

use crate::cli::{ConfirmArgs, GlobalArgs, ToArgs};
use crate::context::RuntimeContext;
use crate::prompt::TerminalConfirm;

/// Execute the up command
pub fn execute_up(args: &ConfirmArgs, global: &GlobalArgs) -> Result<()> {
    run(&Target::Latest, args, global)
}

/// Execute the down command
pub fn execute_down(args: &ConfirmArgs, global: &GlobalArgs) -> Result<()> {
    run(&Target::Previous, args, global)
}

/// Execute the to command
pub fn execute_to(args: &ToArgs, global: &GlobalArgs) -> Result<()> {
    run(&Target::Exact(args.version.clone()), &args.confirm, global)
}

fn run(target: &Target, args: &ConfirmArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let confirm: Box<dyn Confirm> = if args.yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(TerminalConfirm)
    };
    let mut migrator = ctx.into_migrator(confirm)?;
    let summary = migrator.migrate(target).context("Migration failed")?;
    report(&summary);
    Ok(())
}

fn report(summary: &RunSummary) {
    let Some(to) = &summary.to else {
        return;
    };
    log::debug!(
        "Applied {} step(s) from {} to {}",
        summary.steps.len(),
        summary.from,
        to
    );
    for step in summary.steps.iter().filter(|s| !s.is_recorded()) {
        log::warn!(
            "!! {} {} was applied but not fully recorded (version: {}, history: {}); \
             verify with `migrate status` and correct with `migrate mark`",
            step.direction,
            step.version,
            if step.version_recorded { "ok" } else { "failed" },
            if step.history_recorded { "ok" } else { "failed" },
        );
    }
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
