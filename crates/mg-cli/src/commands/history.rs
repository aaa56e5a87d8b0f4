//! History command implementation

use anyhow::{Context, Result};
use mg_engine::{AutoConfirm, HistoryEntry};

use crate::cli::{GlobalArgs, HistoryArgs};
use crate::context::RuntimeContext;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Execute the history command
pub fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let mut migrator = ctx.into_migrator(AutoConfirm(false))?;
    let entries = migrator
        .history(args.limit)
        .context("Failed to read migration history")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", format_entry(entry));
        }
    }
    Ok(())
}

fn format_entry(entry: &HistoryEntry) -> String {
    format!(
        "{} {} -> {}",
        entry.date.format(DATE_FORMAT),
        entry.from,
        entry.to
    )
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
