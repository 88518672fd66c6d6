// Unit tests for logger module initialization logic
// Tests focus on idempotence and level selection

use crate::logger::{LOG_FILE_NAME, initialize, resolve_level};

use log::LevelFilter;
use serial_test::serial;
use tempfile::TempDir;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: Both binaries and the tests install the logger. If a
/// second call errors, startup fails for reasons unrelated to the user's action.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed,
/// causing fern to fail when trying to set a global logger twice.
#[test]
#[serial]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A log directory that does not exist yet
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("logs");

    // WHEN: Calling initialize twice
    let result1 = initialize(&log_dir);
    let result2 = initialize(&log_dir);

    // THEN: Both return Ok and the directory and file were created
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(
        result2.is_ok(),
        "Second initialization should succeed (idempotent)"
    );
    assert!(log_dir.join(LOG_FILE_NAME).exists());
}

/// **VALUE**: A valid `SQUOOSH_LOG` value overrides the build default; anything
/// else falls back to it.
///
/// **BUG THIS CATCHES**: Would catch a typo in the variable silencing all logs
/// by parsing to `Off` instead of falling back.
#[test]
fn given_level_requests_when_resolved_then_valid_ones_override_default() {
    let default = resolve_level(None);

    assert_eq!(resolve_level(Some("trace")), LevelFilter::Trace);
    assert_eq!(resolve_level(Some(" WARN ")), LevelFilter::Warn);
    assert_eq!(resolve_level(Some("loud")), default);
    assert_eq!(resolve_level(Some("")), default);
    if cfg!(debug_assertions) {
        assert_eq!(default, LevelFilter::Debug);
    } else {
        assert_eq!(default, LevelFilter::Info);
    }
}
