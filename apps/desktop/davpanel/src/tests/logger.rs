// Unit tests for logger initialization
// Tests focus on idempotence and error handling

use crate::error::PanelError;
use crate::logger::{LOG_FILE_NAME, build_dispatch, initialize};

use std::path::PathBuf;

use tempfile::TempDir;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: Library code and tests may both try to set up logging. If the
/// second call errors, the panel fails at startup for no real reason.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed,
/// causing fern to fail when trying to set a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A valid temporary directory
    let temp_dir = TempDir::new().unwrap();

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path(), false);
    let result2 = initialize(temp_dir.path(), true);

    // THEN: Both return Ok (the second one only logs a warning)
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(
        result2.is_ok(),
        "Second initialization should succeed (idempotent)"
    );
}

/// **VALUE**: An unusable log directory is an error, not a panic.
///
/// **BUG THIS CATCHES**: Would catch `fern::log_file()` being unwrapped.
#[test]
fn given_invalid_log_dir_when_building_dispatch_then_panel_error() {
    // GIVEN: A path below a file, which can never be a directory
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN
    let result = build_dispatch(&invalid_dir, false);

    // THEN
    assert!(matches!(result, Err(PanelError::Panel { .. })));
}

#[test]
fn given_valid_log_dir_when_building_dispatch_then_log_file_created() {
    let temp_dir = TempDir::new().unwrap();

    let result = build_dispatch(temp_dir.path(), true);

    assert!(result.is_ok());
    assert!(temp_dir.path().join(LOG_FILE_NAME).exists());
}
