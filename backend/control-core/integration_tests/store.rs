use crate::helpers::{FakePicker, sample_config};

use control_core::error::ValidationError;
use control_core::model::{CertConfig, Config};
use control_core::store::{ConfigCommand, ConfigPatch, ConfigStore};

use std::path::PathBuf;

/// **VALUE**: Patches fold left in issue order, each seeing the previous result.
///
/// **WHY THIS MATTERS**: Form edits arrive as a burst of small functional patches.
/// If one patch saw a stale snapshot, an earlier field edit would be lost.
///
/// **BUG THIS CATCHES**: Would catch:
/// - Patches applied to the initial value instead of the running result
/// - `Replace` not discarding earlier fields
#[test]
fn given_sequence_of_patches_when_applied_then_result_is_left_fold() {
    // GIVEN: An empty store
    let store = ConfigStore::new();

    // WHEN: A replacement followed by two functional edits
    store.set_config(sample_config());
    store.update_config(|c| Config {
        port: Some(c.port.unwrap_or_default() + 8000),
        ..c
    });
    store.set_config(ConfigPatch::apply_fn(|c| Config {
        root: Some(String::from("/srv/dav")),
        ..c
    }));

    // THEN: Every edit is visible on top of the previous one
    let config = store.get_config();
    assert_eq!(config.ip.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.root.as_deref(), Some("/srv/dav"));

    // WHEN: A plain replacement
    store.set_config(Config::default());

    // THEN: Nothing from before survives
    assert_eq!(store.get_config(), Config::default());
}

/// **VALUE**: Enabling login requires both members; a refusal changes nothing.
///
/// **BUG THIS CATCHES**: Would catch a half-filled pair being stored, or an
/// existing login being wiped by a rejected edit.
#[test]
fn given_existing_login_when_enable_with_empty_password_then_refused_and_login_kept() {
    // GIVEN: Login enabled for alice
    let store = ConfigStore::new();
    store.set_auth(true, "alice", "secret").unwrap();

    // WHEN: Enabling with an empty password
    let result = store.set_auth(true, "bob", "");

    // THEN: Refused, alice still configured
    assert!(matches!(result, Err(ValidationError::AuthIncomplete { .. })));
    let auth = store.get_config().auth.expect("login should survive");
    assert_eq!(auth.username(), "alice");
    assert_eq!(auth.password().as_str(), "secret");
}

#[test]
fn given_login_enabled_when_disabled_then_auth_absent_regardless_of_arguments() {
    let store = ConfigStore::new();
    store.set_auth(true, "alice", "secret").unwrap();

    store.set_auth(false, "", "").unwrap();

    assert!(store.get_config().auth.is_none());
}

#[test]
fn given_empty_username_when_enabling_login_then_refused() {
    let store = ConfigStore::new();

    let result = store.apply(ConfigCommand::SetAuth {
        enabled: true,
        username: String::new(),
        password: String::from("secret"),
    });

    assert!(matches!(result, Err(ValidationError::AuthIncomplete { .. })));
    assert!(store.get_config().auth.is_none());
}

/// **VALUE**: TLS path edits merge field by field.
///
/// **WHY THIS MATTERS**: The operator picks the certificate and the key in two
/// separate steps. Picking the key must not forget the certificate.
///
/// **BUG THIS CATCHES**: Would catch a partial patch overwriting the whole cert
/// draft, or an empty patch being accepted and clearing nothing silently.
#[test]
fn given_cert_path_set_when_key_path_patched_then_both_kept() {
    // GIVEN: A certificate path
    let store = ConfigStore::new();
    store
        .set_cert_path(CertConfig::new(Some(String::from("/tls/cert.pem")), None))
        .unwrap();

    // WHEN: Only the key path is patched
    store
        .set_cert_path(CertConfig::new(None, Some(String::from("/tls/key.pem"))))
        .unwrap();

    // THEN: Both are present
    assert_eq!(
        store.cert_config(),
        CertConfig::new(
            Some(String::from("/tls/cert.pem")),
            Some(String::from("/tls/key.pem"))
        )
    );

    // WHEN: An empty patch
    let result = store.set_cert_path(CertConfig::default());

    // THEN: Refused, draft unchanged
    assert!(matches!(result, Err(ValidationError::EmptyCertPatch { .. })));
    assert_eq!(
        store.cert_config().cert_path.as_deref(),
        Some("/tls/cert.pem")
    );
}

#[tokio::test]
async fn given_picker_returns_directory_when_choose_root_then_root_set() {
    // GIVEN: A draft with an address and a picker that answers
    let store = ConfigStore::with_config(sample_config());
    let picker = FakePicker(Some(PathBuf::from("/srv/share")));

    // WHEN
    let changed = store.choose_root(&picker).await;

    // THEN: root set, rest of the draft untouched
    assert!(changed);
    let config = store.get_config();
    assert_eq!(config.root.as_deref(), Some("/srv/share"));
    assert_eq!(config.port, Some(80));
}

#[tokio::test]
async fn given_picker_cancelled_when_choose_root_then_root_unchanged() {
    let store = ConfigStore::new();
    store.apply(ConfigCommand::SetRoot(String::from("/old"))).unwrap();

    let changed = store.choose_root(&FakePicker(None)).await;

    assert!(!changed);
    assert_eq!(store.get_config().root.as_deref(), Some("/old"));
}

/// **VALUE**: Subscribers observe the latest draft after a change.
///
/// **BUG THIS CATCHES**: Would catch mutations that bypass the watch channel,
/// leaving the front end rendering an old draft.
#[tokio::test]
async fn given_subscriber_when_config_changes_then_notified_with_latest() {
    // GIVEN
    let store = ConfigStore::new();
    let mut rx = store.subscribe();
    let clone = store.clone();

    // WHEN: A clone of the store mutates the draft
    clone.set_config(sample_config());

    // THEN
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), sample_config());
}
