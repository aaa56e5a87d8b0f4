//! Status command implementation

use anyhow::{Context, Result};
use mg_core::{Registry, Version};
use mg_engine::AutoConfirm;
use serde::Serialize;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::context::RuntimeContext;

const CURRENT_MARKER: &str = "-> ";
const PLAIN_MARKER: &str = "   ";

/// One row of the status report
#[derive(Debug, Serialize)]
struct MigrationStatus {
    version: Version,
    code: String,
    parts: Vec<u32>,
    current: bool,
}

/// Status report for JSON output
#[derive(Debug, Serialize)]
struct StatusReport {
    current: Version,
    migrations: Vec<MigrationStatus>,
}

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let mut migrator = ctx.into_migrator(AutoConfirm(false))?;
    let current = migrator
        .current_version()
        .context("Failed to read current version")?;

    if args.json {
        let report = build_report(migrator.registry(), &current);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in render_tree(migrator.registry(), &current) {
            println!("{line}");
        }
    }
    Ok(())
}

fn build_report(registry: &Registry, current: &Version) -> StatusReport {
    let migrations = registry
        .iter()
        .map(|(version, migration)| MigrationStatus {
            version: version.clone(),
            code: migration.display_code(),
            parts: migration.part_numbers().collect(),
            current: version == current,
        })
        .collect();
    StatusReport {
        current: current.clone(),
        migrations,
    }
}

/// `(null)` followed by every migration, with the current one marked.
fn render_tree(registry: &Registry, current: &Version) -> Vec<String> {
    let marker = |version: &Version| {
        if version == current {
            CURRENT_MARKER
        } else {
            PLAIN_MARKER
        }
    };

    let mut lines = Vec::with_capacity(registry.len() + 1);
    lines.push(format!(
        "{}{}",
        marker(&Version::None),
        Version::None.sentinel_label().unwrap_or_default()
    ));
    for (version, migration) in registry.iter() {
        let mut line = format!("{}{} {}", marker(version), version, migration.display_code());
        if migration.part_count() > 1 {
            let parts: Vec<String> = migration.part_numbers().map(|n| n.to_string()).collect();
            line.push_str(&format!(" (parts: {})", parts.join(", ")));
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
