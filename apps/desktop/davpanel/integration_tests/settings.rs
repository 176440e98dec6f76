use davpanel::commands::settings::{resolve, show};
use davpanel::error::PanelError;

use control_core::config::PanelSettings;

use tempfile::TempDir;

#[test]
fn given_backend_url_flag_when_resolving_then_overrides_file() {
    // GIVEN: A settings file pointing elsewhere
    let dir = TempDir::new().unwrap();
    let mut on_disk = PanelSettings::default();
    on_disk.backend.base_url = String::from("http://10.0.0.1:7878/");
    on_disk.polling.interval_ms = 500;
    on_disk.save(dir.path()).unwrap();

    // WHEN
    let settings = resolve(dir.path(), Some("http://10.0.0.9:7000/")).unwrap();

    // THEN: Flag wins, the rest comes from the file
    assert_eq!(settings.backend.base_url, "http://10.0.0.9:7000/");
    assert_eq!(settings.polling.interval_ms, 500);
}

#[test]
fn given_invalid_backend_url_flag_when_resolving_then_settings_error() {
    let dir = TempDir::new().unwrap();

    let result = resolve(dir.path(), Some("ftp://backend"));

    assert!(matches!(result, Err(PanelError::Settings { .. })));
}

/// **VALUE**: `settings --write` persists overrides so later runs pick them up.
#[test]
fn given_write_flag_when_show_then_settings_persisted() {
    let dir = TempDir::new().unwrap();
    let settings = resolve(dir.path(), Some("http://10.0.0.9:7000/")).unwrap();

    show(&settings, dir.path(), true).unwrap();

    let reloaded = resolve(dir.path(), None).unwrap();
    assert_eq!(reloaded, settings);
}
