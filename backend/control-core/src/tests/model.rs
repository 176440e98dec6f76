use crate::controller::{Notice, ServerState};
use crate::error::{ServerError, ValidationError};
use crate::model::{CertConfig, Config, Credentials, Liveness};
use crate::rpc::RpcCall;

use serde_json::json;

/// **VALUE**: The backend reads camelCase keys and an `[user, password]` pair.
///
/// **BUG THIS CATCHES**: Would catch `enableTls` drifting to `enable_tls`, or the
/// password being dropped because the secret refuses serde serialization.
#[test]
fn given_full_config_when_serialized_then_matches_wire_format() {
    // GIVEN: A fully populated config
    let config = Config {
        ip: Some(String::from("0.0.0.0")),
        port: Some(8080),
        root: Some(String::from("/srv/dav")),
        auth: Some(Credentials::new("alice", "secret").unwrap()),
        enable_tls: Some(true),
    };

    // WHEN: Serializing
    let value = serde_json::to_value(&config).unwrap();

    // THEN: Keys and shapes match the backend contract
    assert_eq!(
        value,
        json!({
            "ip": "0.0.0.0",
            "port": 8080,
            "root": "/srv/dav",
            "auth": ["alice", "secret"],
            "enableTls": true
        })
    );
}

#[test]
fn given_empty_config_when_serialized_then_omits_absent_fields() {
    let value = serde_json::to_value(Config::default()).unwrap();

    assert_eq!(value, json!({}));
}

/// **VALUE**: An incomplete stored login disables auth without losing the rest.
///
/// **WHY THIS MATTERS**: Config files can be edited by hand on the server. A
/// blank password there must not leave the panel unable to load anything.
///
/// **BUG THIS CATCHES**: Would catch a strict `Credentials` decode turning the
/// whole get_config into a JSON error.
#[test]
fn given_auth_with_empty_password_when_deserialized_then_login_dropped_and_rest_kept() {
    let config: Config = serde_json::from_value(json!({
        "ip": "0.0.0.0",
        "port": 8080,
        "root": "/srv",
        "auth": ["admin", ""]
    }))
    .unwrap();

    assert_eq!(config.auth, None);
    assert_eq!(config.ip.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.root.as_deref(), Some("/srv"));
}

#[test]
fn given_auth_null_or_missing_when_deserialized_then_none() {
    let null: Config = serde_json::from_value(json!({ "auth": null })).unwrap();
    let missing: Config = serde_json::from_value(json!({ "port": 80 })).unwrap();

    assert_eq!(null.auth, None);
    assert_eq!(missing.auth, None);
}

#[test]
fn given_empty_members_when_credentials_created_then_validation_error() {
    assert!(matches!(
        Credentials::new("", "x"),
        Err(ValidationError::AuthIncomplete { .. })
    ));
    assert!(matches!(
        Credentials::new("u", ""),
        Err(ValidationError::AuthIncomplete { .. })
    ));

    let credentials = Credentials::new("u", "p").unwrap();
    assert_eq!(credentials.username(), "u");
    assert_eq!(credentials.password().as_str(), "p");
    assert!(!format!("{credentials:?}").contains("\"p\""));
}

#[test]
fn given_port_unset_when_effective_port_then_follows_tls() {
    let plain = Config::default();
    let tls = Config {
        enable_tls: Some(true),
        ..Default::default()
    };
    let explicit = Config {
        port: Some(8443),
        enable_tls: Some(true),
        ..Default::default()
    };

    assert_eq!(plain.effective_port(), 80);
    assert_eq!(tls.effective_port(), 443);
    assert_eq!(explicit.effective_port(), 8443);
}

#[test]
fn given_missing_or_empty_ip_when_display_address_then_uses_wildcard() {
    let missing = Config::default();
    let empty = Config {
        ip: Some(String::new()),
        port: Some(8080),
        ..Default::default()
    };
    let set = Config {
        ip: Some(String::from("127.0.0.1")),
        ..Default::default()
    };

    assert_eq!(missing.display_address(), "*:80");
    assert_eq!(empty.display_address(), "*:8080");
    assert_eq!(set.display_address(), "127.0.0.1:80");
}

#[test]
fn given_cert_patch_when_merged_then_only_provided_fields_change() {
    let mut cert = CertConfig::new(Some(String::from("a.pem")), None);

    cert.merge(CertConfig::new(None, Some(String::from("b.pem"))));
    assert_eq!(cert, CertConfig::new(Some(String::from("a.pem")), Some(String::from("b.pem"))));

    cert.merge(CertConfig::new(Some(String::from("c.pem")), None));
    assert_eq!(cert.cert_path.as_deref(), Some("c.pem"));
    assert_eq!(cert.key_path.as_deref(), Some("b.pem"));
}

#[test]
fn given_cert_config_when_serialized_then_uses_camel_case_args() {
    let cert = CertConfig::new(Some(String::from("/tmp/cert.pem")), None);

    let value = serde_json::to_value(&cert).unwrap();

    assert_eq!(value, json!({ "certPath": "/tmp/cert.pem" }));
    assert!(CertConfig::default().is_empty());
}

#[test]
fn given_status_wire_values_when_deserialized_then_map_to_liveness() {
    assert_eq!(
        serde_json::from_value::<Liveness>(json!("running")).unwrap(),
        Liveness::Running
    );
    assert_eq!(
        serde_json::from_value::<Liveness>(json!("stopped")).unwrap(),
        Liveness::Stopped
    );
    assert!(serde_json::from_value::<Liveness>(json!("starting")).is_err());
}

#[test]
fn given_error_and_warning_when_notice_requested_then_error_wins() {
    // GIVEN: A state with both queued
    let mut state = ServerState {
        last_error: Some(ServerError::rejected(RpcCall::StartServer, "port in use")),
        last_warning: Some(ValidationError::auth_incomplete()),
        ..Default::default()
    };

    // THEN: The error is shown first, with the backend's message verbatim
    assert_eq!(
        state.notice(),
        Some(Notice::Error(String::from("port in use")))
    );

    // AND: Once it is gone, the warning shows
    state.last_error = None;
    let notice = state.notice().unwrap();
    assert_eq!(notice.title(), "Warning");
    assert_eq!(
        notice.message(),
        "User and Password must be set to enable login."
    );
}
