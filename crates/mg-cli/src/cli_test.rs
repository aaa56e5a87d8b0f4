use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    Cli::command().debug_assert();
}

#[test]
fn test_to_accepts_aliases() {
    let cli = Cli::try_parse_from(["migrate", "to", "init", "--yes"]).unwrap();
    match cli.command {
        Commands::To(args) => {
            assert_eq!(args.version, Version::Init);
            assert!(args.confirm.yes);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["migrate", "mark", "null"]).unwrap();
    assert!(matches!(cli.command, Commands::Mark(MarkArgs { version: Version::None })));
}

#[test]
fn test_to_rejects_malformed_version() {
    assert!(Cli::try_parse_from(["migrate", "to", "yesterday"]).is_err());
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from([
        "migrate",
        "history",
        "--limit",
        "5",
        "--dev",
        "-d",
        ":memory:",
    ])
    .unwrap();
    assert!(cli.global.dev);
    assert_eq!(cli.global.database.as_deref(), Some(":memory:"));
    match cli.command {
        Commands::History(args) => assert_eq!(args.limit, 5),
        other => panic!("unexpected command: {other:?}"),
    }
}
