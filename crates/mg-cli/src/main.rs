//! migrate - schema migrations with resumable multi-part steps

use anyhow::Result;
use clap::Parser;
use std::io::Write;

mod cli;
mod commands;
mod context;
mod prompt;

use cli::Cli;
use commands::{history, mark, migrate, status};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.global.verbose);

    match &cli.command {
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::History(args) => history::execute(args, &cli.global),
        cli::Commands::Up(args) => migrate::execute_up(args, &cli.global),
        cli::Commands::Down(args) => migrate::execute_down(args, &cli.global),
        cli::Commands::To(args) => migrate::execute_to(args, &cli.global),
        cli::Commands::Mark(args) => mark::execute(args, &cli.global),
    }
}

/// Progress lines are printed bare so they read like console output;
/// `RUST_LOG` still overrides the default filter.
fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| match record.level() {
            log::Level::Error | log::Level::Warn | log::Level::Info => {
                writeln!(buf, "{}", record.args())
            }
            level => writeln!(
                buf,
                "[{}] {}",
                level.as_str().to_lowercase(),
                record.args()
            ),
        })
        .init();
}
