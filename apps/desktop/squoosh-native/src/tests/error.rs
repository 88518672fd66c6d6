// Unit tests for error module
// Tests that core errors keep their message and location through HostError

use crate::error::HostError;

use bridge_core::error::{ConfigError, CoreError, ResourceError};

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Core errors convert into `HostError` without losing their text.
///
/// **WHY THIS MATTERS**: Startup failures are printed once and the process
/// exits; the printed line is all the user gets.
///
/// **BUG THIS CATCHES**: Would catch a `From` impl that replaces the original
/// error with a generic message, or drops the location.
#[test]
fn given_provider_init_error_when_converted_then_message_and_location_kept() {
    // GIVEN: A ProviderInit error from a missing archive
    let err = ResourceError::provider_init("squoosh.pak", "archive not found");

    // WHEN: Converting as `?` does in main
    let host: HostError = err.into();

    // THEN: Same text, wrapped in the Core variant
    let text = host.to_string();
    assert!(matches!(host, HostError::Core(CoreError::Resource(_))));
    assert!(text.contains("Provider Init Error"));
    assert!(text.contains("squoosh.pak"));
    assert!(text.contains("error.rs"));
}

#[test]
fn given_missing_config_dir_error_when_converted_then_core_config_variant() {
    let err = ConfigError::DirectoryNotFound {
        location: ErrorLocation::from(Location::caller()),
        reason: "platform has no config directory".to_string(),
    };

    let host = HostError::from(err);

    assert!(matches!(host, HostError::Core(CoreError::Config(_))));
    assert!(host.to_string().contains("Config Directory Not Found Error"));
}

#[test]
fn given_host_error_when_formatted_then_includes_location() {
    let err = HostError::Host {
        message: String::from("Failed to wait for Ctrl-C"),
        location: ErrorLocation::from(Location::caller()),
    };

    let error_string = format!("{}", err);

    assert!(error_string.contains("Host Error"));
    assert!(error_string.contains("Failed to wait for Ctrl-C"));
    assert!(error_string.contains("error.rs"));
}
