use bridge_core::error::asset::AssetError;
use bridge_core::error::resource::ResourceError;

use std::error::Error;
use std::io::{Error as IoError, ErrorKind};

/// **VALUE**: Verifies that `ResourceError::NotFound` records where it was raised.
///
/// **WHY THIS MATTERS**: A miss can come from the mount table, a local tree or
/// an archive lookup. The location says which one gave up.
///
/// **BUG THIS CATCHES**: Would catch if someone removes `#[track_caller]` from
/// `ResourceError::not_found()`, making every miss point into error/resource.rs.
#[test]
fn given_not_found_error_when_formatted_then_includes_caller_location() {
    // GIVEN: A NotFound error raised here
    let err = ResourceError::not_found("/assets/app.js");

    // WHEN: Formatting the error as string
    let error_string = format!("{}", err);

    // THEN: Should include error type, path, and this file
    assert!(error_string.contains("Not Found Error"));
    assert!(error_string.contains("/assets/app.js"));
    assert!(error_string.contains("resource.rs"));
    assert!(error_string.contains("integration_tests"));
}

/// **VALUE**: Verifies that resource I/O errors keep their source chain.
///
/// **BUG THIS CATCHES**: Would catch if the `#[source]` attribute is dropped
/// and the underlying OS error disappears from error reports.
#[test]
fn given_io_error_when_source_requested_then_returns_io_error() {
    // GIVEN: An Io error wrapping a permission failure
    let err = ResourceError::io("index.html", IoError::new(ErrorKind::PermissionDenied, "denied"));

    // WHEN: Getting the error source
    let source = err.source();

    // THEN: The original io::Error is reachable
    let io = source
        .and_then(|s| s.downcast_ref::<IoError>())
        .expect("Should expose io::Error as source");
    assert_eq!(io.kind(), ErrorKind::PermissionDenied);
}

/// **VALUE**: Resource misses become 404s; every other resource failure is a 500.
///
/// **BUG THIS CATCHES**: Would catch mapping archive corruption to 404, which
/// hides a broken release archive behind "file not found".
#[test]
fn given_resource_errors_when_converted_to_asset_errors_then_statuses_match() {
    let missing: AssetError = ResourceError::not_found("/x").into();
    let broken: AssetError = ResourceError::io("x", IoError::other("disk on fire")).into();

    assert_eq!(missing.status_code().as_u16(), 404);
    assert_eq!(broken.status_code().as_u16(), 500);
}
