use crate::ClientToken;

/// **VALUE**: Verifies the token never appears in Debug or Display output.
///
/// **WHY THIS MATTERS**: The token is logged next to the server address at startup and
/// travels through structs that derive Debug. Anyone with the token can read every asset.
///
/// **BUG THIS CATCHES**: Would catch a derived Debug or a Display that prints the value.
#[test]
fn given_client_token_when_formatted_then_value_is_redacted() {
    // GIVEN: A token with a recognizable value
    let token = ClientToken::new("super-secret-value");

    // WHEN: Formatting with Debug and Display
    let debug = format!("{:?}", token);
    let display = format!("{}", token);

    // THEN: Neither output contains the value
    assert!(!debug.contains("super-secret-value"));
    assert!(!display.contains("super-secret-value"));
    assert!(debug.contains("REDACTED"));
}

/// **VALUE**: Verifies `matches()` accepts only the exact token.
///
/// **WHY THIS MATTERS**: This comparison is the whole access-control decision for assets.
///
/// **BUG THIS CATCHES**: Would catch prefix matches, length mismatches treated as equal,
/// or an empty presented value being accepted.
#[test]
fn given_client_token_when_matching_then_only_exact_value_passes() {
    // GIVEN: A token
    let token = ClientToken::new("abc123");

    // THEN: Only the exact value matches
    assert!(token.matches("abc123"));
    assert!(!token.matches("abc12"));
    assert!(!token.matches("abc1234"));
    assert!(!token.matches("abc124"));
    assert!(!token.matches(""));
}

/// **VALUE**: Verifies that serializing a token fails instead of leaking it.
///
/// **WHY THIS MATTERS**: Config and diagnostics are serialized to JSON; a token field
/// sneaking into one of them must not end up on disk.
///
/// **BUG THIS CATCHES**: Would catch if someone derives Serialize on ClientToken.
#[test]
fn given_client_token_when_serialized_then_returns_error() {
    // GIVEN: A token
    let token = ClientToken::new("abc123");

    // WHEN: Serializing to JSON
    let result = serde_json::to_string(&token);

    // THEN: Serialization is refused
    assert!(result.is_err(), "ClientToken must refuse serialization");
}
