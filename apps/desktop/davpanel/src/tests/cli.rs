use crate::cli::{Cli, Command};

use clap::Parser;

#[test]
fn given_login_and_tls_flags_when_parsed_then_changes_requested() {
    let cli = Cli::try_parse_from([
        "davpanel",
        "start",
        "--user",
        "alice",
        "--password",
        "secret",
        "--tls",
        "--port",
        "8443",
    ])
    .unwrap();

    let Command::Start(args) = cli.command else {
        panic!("expected start");
    };
    assert_eq!(args.auth_change(), Some(true));
    assert_eq!(args.tls_change(), Some(true));
    assert_eq!(args.port, Some(8443));
}

/// **VALUE**: A bare start leaves login and TLS as the backend has them.
///
/// **BUG THIS CATCHES**: Would catch a missing flag being read as "disable".
#[test]
fn given_no_flags_when_parsed_then_nothing_changes() {
    let cli = Cli::try_parse_from(["davpanel", "start"]).unwrap();

    let Command::Start(args) = cli.command else {
        panic!("expected start");
    };
    assert_eq!(args.auth_change(), None);
    assert_eq!(args.tls_change(), None);
}

#[test]
fn given_password_without_user_when_parsed_then_login_enable_requested() {
    // The store refuses the incomplete pair later, with a warning.
    let cli = Cli::try_parse_from(["davpanel", "start", "--password", "secret"]).unwrap();

    let Command::Start(args) = cli.command else {
        panic!("expected start");
    };
    assert_eq!(args.auth_change(), Some(true));
}

#[test]
fn given_conflicting_flags_when_parsed_then_rejected() {
    assert!(Cli::try_parse_from(["davpanel", "start", "--tls", "--no-tls"]).is_err());
    assert!(Cli::try_parse_from(["davpanel", "start", "--user", "a", "--no-auth"]).is_err());
    assert!(Cli::try_parse_from(["davpanel", "start", "--root", "/srv", "--pick-root"]).is_err());
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_accepted() {
    let cli = Cli::try_parse_from([
        "davpanel",
        "status",
        "--json",
        "--backend-url",
        "http://10.0.0.5:7878/",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.backend_url.as_deref(), Some("http://10.0.0.5:7878/"));
    assert!(matches!(cli.command, Command::Status));
}
