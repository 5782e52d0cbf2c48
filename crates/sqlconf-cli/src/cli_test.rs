use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn parse_defaults_to_pretty() {
    let cli = Cli::try_parse_from(["sqlconf", "parse", "sql://u:p@h/ctx:c/conf:d/map:m"]).unwrap();
    match cli.command {
        Commands::Parse(args) => assert_eq!(args.output, ParseOutput::Pretty),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "sqlconf",
        "cat",
        "/etc/proftpd.conf",
        "--buffer-size",
        "16",
        "--verbose",
        "--data-dir",
        "/var/lib/sqlconf",
    ])
    .unwrap();

    assert!(cli.global.verbose);
    assert_eq!(cli.global.data_dir.as_deref(), Some("/var/lib/sqlconf"));
    match cli.command {
        Commands::Cat(args) => assert_eq!(args.buffer_size, Some(16)),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn render_requires_descriptor() {
    assert!(Cli::try_parse_from(["sqlconf", "render"]).is_err());
}
