use control_core::DEFAULT_BACKEND_URL;
use control_core::config::PanelSettings;
use control_core::error::ConfigError;

use std::time::Duration;

use tempfile::TempDir;

/// **VALUE**: First launch (no settings file) works with defaults.
///
/// **BUG THIS CATCHES**: Would catch a missing file being reported as an error,
/// which would stop the panel from ever starting on a fresh machine.
#[test]
fn given_no_settings_file_when_load_then_defaults() {
    // GIVEN: An empty directory
    let dir = TempDir::new().unwrap();

    // WHEN
    let settings = PanelSettings::load(dir.path()).unwrap();

    // THEN
    assert_eq!(settings, PanelSettings::default());
    assert_eq!(settings.backend.base_url, DEFAULT_BACKEND_URL);
    assert_eq!(settings.poll_interval(), Duration::from_millis(2000));
    assert_eq!(settings.rpc_timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn given_saved_settings_when_loaded_then_same_values_and_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let mut settings = PanelSettings::default();
    settings.backend.base_url = String::from("http://10.0.0.5:9000/");
    settings.backend.rpc_timeout_secs = 0;
    settings.polling.interval_ms = 500;

    settings.save(dir.path()).unwrap();
    let loaded = PanelSettings::load(dir.path()).unwrap();

    assert_eq!(loaded, settings);
    assert_eq!(loaded.rpc_timeout(), None);
    assert!(!dir.path().join("settings.json.tmp").exists());
}

#[test]
fn given_partial_file_when_load_then_missing_sections_defaulted() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{ "polling": { "interval_ms": 750 } }"#,
    )
    .unwrap();

    let settings = PanelSettings::load(dir.path()).unwrap();

    assert_eq!(settings.polling.interval_ms, 750);
    assert_eq!(settings.backend.base_url, DEFAULT_BACKEND_URL);
    assert_eq!(settings.version, 1);
}

#[test]
fn given_corrupt_file_when_load_then_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ this is not json").unwrap();

    let result = PanelSettings::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Values the control plane cannot honor are rejected on load and save.
///
/// **BUG THIS CATCHES**: Would catch a 0ms poll interval spinning the CPU, a future
/// settings version being read with today's meaning, or a non-HTTP backend URL.
#[test]
fn given_invalid_values_when_validated_then_validation_error() {
    let mut too_fast = PanelSettings::default();
    too_fast.polling.interval_ms = 10;
    assert!(matches!(
        too_fast.validate(),
        Err(ConfigError::ValidationError { .. })
    ));

    let mut future = PanelSettings::default();
    future.version = 2;
    assert!(matches!(
        future.validate(),
        Err(ConfigError::ValidationError { .. })
    ));

    let mut bad_url = PanelSettings::default();
    bad_url.backend.base_url = String::from("ftp://backend");
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        bad_url.save(dir.path()),
        Err(ConfigError::ValidationError { .. })
    ));
    assert!(!dir.path().join("settings.json").exists());
}
