use crate::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every error in the workspace carries an ErrorLocation. If it
/// points at the wrong place, every logged failure loses its debugging value.
///
/// **BUG THIS CATCHES**: Would catch a broken file/line/column mapping.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN: The line where the location is taken
    let expected_line = line!() + 3;

    // WHEN: Creating ErrorLocation from caller
    let location = ErrorLocation::from(Location::caller());

    // THEN: Should capture file, line, and column
    assert!(
        location.file().contains("error_location.rs"),
        "Should capture file path"
    );
    assert_eq!(location.line(), expected_line, "Should capture correct line number");
    assert!(location.column() > 0, "Should capture column number");
}

/// **VALUE**: Verifies the bracketed `[file:line:column]` Display format.
///
/// **BUG THIS CATCHES**: Would catch format drift that makes log lines unreadable.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN
    let location = ErrorLocation::from(Location::caller());

    // WHEN
    let formatted = location.to_string();

    // THEN
    assert_eq!(
        formatted,
        format!(
            "[{}:{}:{}]",
            location.file(),
            location.line(),
            location.column()
        )
    );
    assert_eq!(format!("{location:?}"), format!("ErrorLocation{formatted}"));
}

#[test]
fn given_error_location_when_serialized_then_has_file_line_column_fields() {
    let location = ErrorLocation::from(Location::caller());

    let value = serde_json::to_value(location).unwrap();

    assert_eq!(value["file"], location.file());
    assert_eq!(value["line"], location.line());
    assert_eq!(value["column"], location.column());
}
