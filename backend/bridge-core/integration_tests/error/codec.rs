use bridge_core::error::codec::CodecError;
use bridge_core::error::rpc::HandlerFailure;

use std::io::{Error as IoError, ErrorKind};

/// **VALUE**: Verifies that codec errors carry the failure kind the frontend shows.
///
/// **WHY THIS MATTERS**: The frontend tells "encoder missing" apart from
/// "encoder crashed" by the envelope's kind string, not by parsing messages.
///
/// **BUG THIS CATCHES**: Would catch if the `From<CodecError>` conversion
/// collapses every codec failure into a single generic kind.
#[test]
fn given_codec_errors_when_converted_to_handler_failures_then_kinds_preserved() {
    // GIVEN: A spawn failure and a non-zero exit
    let spawn = CodecError::spawn("cwebp", IoError::new(ErrorKind::NotFound, "no such file"));
    let exit = CodecError::exit_status("cwebp", "exit status: 1", "bad input");

    // WHEN: Converting as the RPC layer does
    let spawn_failure = HandlerFailure::from(spawn);
    let exit_failure = HandlerFailure::from(exit);

    // THEN: Kinds survive and the message names the tool
    assert_eq!(spawn_failure.kind, "ToolSpawnError");
    assert_eq!(exit_failure.kind, "ToolExitError");
    assert!(exit_failure.message.contains("cwebp"));
    assert!(exit_failure.message.contains("bad input"));
}

#[test]
fn given_invalid_option_error_when_formatted_then_names_encoder() {
    let err = CodecError::invalid_option("webP", "alpha_filtering=5 is not one of 3 choices");

    let error_string = format!("{}", err);

    assert_eq!(err.kind(), "InvalidOption");
    assert!(error_string.contains("webP"));
    assert!(error_string.contains("alpha_filtering=5"));
}
