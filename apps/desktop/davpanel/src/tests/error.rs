// Unit tests for error module
// Tests the JSON shape printed with --json

use crate::error::PanelError;

use control_core::controller::Notice;
use control_core::error::ConfigError;

use common::ErrorLocation;

use std::panic::Location;

use serde_json::json;

/// **VALUE**: Errors serialize as `{ "type": ..., "data": ... }`.
///
/// **WHY THIS MATTERS**: Scripts driving `davpanel --json` branch on `type`.
///
/// **BUG THIS CATCHES**: Would catch the serde tag attributes being removed or a
/// non-serializable field being added.
#[test]
fn given_panel_error_when_serialized_then_tagged() {
    // GIVEN
    let err = PanelError::Core {
        message: String::from("backend unreachable"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN
    let value = serde_json::to_value(&err).unwrap();

    // THEN
    assert_eq!(value["type"], "Core");
    assert_eq!(value["data"]["message"], "backend unreachable");
    assert!(value["data"]["location"]["line"].is_number());
}

/// **VALUE**: A notice keeps the operator-facing text and nothing else.
///
/// **BUG THIS CATCHES**: Would catch the source location leaking into the dialog text.
#[test]
fn given_error_notice_when_converted_then_title_and_message_only() {
    let err = PanelError::from(Notice::Error(String::from("port in use")));

    assert_eq!(err.to_string(), "Error: port in use");
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({
            "type": "Notice",
            "data": { "title": "Error", "message": "port in use" }
        })
    );
}

#[test]
fn given_config_error_when_converted_then_settings_variant() {
    let config_error = ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: String::from("Invalid poll interval"),
    };

    let err = PanelError::from(config_error);

    match err {
        PanelError::Settings { message, .. } => {
            assert!(message.contains("Invalid poll interval"));
        }
        other => panic!("expected Settings, got {other:?}"),
    }
}
