//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use mg_core::Version;
use mg_engine::DEFAULT_HISTORY_LIMIT;
use std::path::PathBuf;

/// migrate - move a database schema between versions
#[derive(Parser, Debug)]
#[command(name = "migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override database path (relative paths resolve against the project directory)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Include the dev migration (also enabled by APP_ENV=dev)
    #[arg(long, global = true)]
    pub dev: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show registered migrations and the current version
    Status(StatusArgs),

    /// Show migration history, newest first
    History(HistoryArgs),

    /// Migrate to the latest version
    Up(ConfirmArgs),

    /// Migrate to the previous version
    Down(ConfirmArgs),

    /// Migrate to the selected version
    To(ToArgs),

    /// Change the current version without running migrations
    Mark(MarkArgs),
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print JSON instead of a tree
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub limit: usize,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments shared by commands that may stop to ask for confirmation
#[derive(Args, Debug, Clone)]
pub struct ConfirmArgs {
    /// Continue without asking when a migration is not in its initial state
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the to command
#[derive(Args, Debug)]
pub struct ToArgs {
    /// Target version: YYMMDDTHHMMSS, null, init or dev
    pub version: Version,

    #[command(flatten)]
    pub confirm: ConfirmArgs,
}

/// Arguments for the mark command
#[derive(Args, Debug)]
pub struct MarkArgs {
    /// Version to record: YYMMDDTHHMMSS, null, init or dev
    pub version: Version,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
