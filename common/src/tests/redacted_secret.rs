use crate::RedactedSecret;

/// **VALUE**: Passwords must never appear in logs.
///
/// **BUG THIS CATCHES**: Would catch a derived Debug/Display leaking the value
/// when the config draft is logged before a start request.
#[test]
fn given_secret_when_debug_and_display_formatted_then_value_hidden() {
    // GIVEN: A password
    let secret = RedactedSecret::new("hunter2");

    // WHEN: Formatting it
    let debug = format!("{secret:?}");
    let display = secret.to_string();

    // THEN: Neither output contains the value
    assert!(!debug.contains("hunter2"));
    assert!(!display.contains("hunter2"));
    assert_eq!(secret.as_str(), "hunter2");
    assert_eq!(secret.len(), 7);
}

/// **VALUE**: Serde serialization is refused so the value only leaves via `as_str()`.
#[test]
fn given_secret_when_serialized_then_fails() {
    let secret = RedactedSecret::from("hunter2");

    let result = serde_json::to_string(&secret);

    let err = result.expect_err("Serializing a secret should fail");
    assert!(err.to_string().contains("Secret Serialization Refused"));
    assert!(!err.to_string().contains("hunter2"));
}

#[test]
fn given_empty_secret_when_checked_then_is_empty() {
    assert!(RedactedSecret::default().is_empty());
    assert_eq!(RedactedSecret::from("a"), RedactedSecret::new(String::from("a")));
}
