use crate::server::range::{ByteWindow, parse_range};

fn window(start: u64, end: u64) -> Option<ByteWindow> {
    Some(ByteWindow { start, end })
}

/// **VALUE**: Inclusive `a-b` ranges become half-open windows.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one that serves 10 bytes for
/// `bytes=10-20` instead of 11.
#[test]
fn given_closed_range_when_parsed_then_end_is_exclusive() {
    // GIVEN/WHEN/THEN
    let parsed = parse_range("bytes=10-20", 100);
    assert_eq!(parsed, window(10, 21));
    assert_eq!(parsed.unwrap().len(), 11);
    assert_eq!(parsed.unwrap().content_range(100), "bytes 10-20/100");
}

#[test]
fn given_open_and_suffix_ranges_when_parsed_then_resolved_against_size() {
    assert_eq!(parse_range("bytes=95-", 100), window(95, 100));
    assert_eq!(parse_range("bytes=-10", 100), window(90, 100));
    assert_eq!(parse_range("bytes=-500", 100), window(0, 100));
    assert_eq!(parse_range("bytes=90-200", 100), window(90, 100));
}

/// **VALUE**: Ranges past the end are unsatisfiable.
///
/// **WHY THIS MATTERS**: The server answers 416 exactly when this returns `None`.
#[test]
fn given_range_beyond_size_when_parsed_then_none() {
    assert_eq!(parse_range("bytes=200-300", 100), None);
    assert_eq!(parse_range("bytes=100-", 100), None);
    assert_eq!(parse_range("bytes=-0", 100), None);
    assert_eq!(parse_range("bytes=0-0", 0), None);
}

#[test]
fn given_range_list_when_parsed_then_first_satisfiable_wins() {
    // GIVEN: An unsatisfiable range followed by two good ones
    let parsed = parse_range("bytes=200-300, 0-4, 10-20", 100);

    // THEN: The first good one is served
    assert_eq!(parsed, window(0, 5));
}

#[test]
fn given_malformed_headers_when_parsed_then_none() {
    assert_eq!(parse_range("items=0-4", 100), None);
    assert_eq!(parse_range("bytes=abc-4", 100), None);
    assert_eq!(parse_range("bytes=5", 100), None);
    assert_eq!(parse_range("bytes=-", 100), None);
    assert_eq!(parse_range("bytes=20-10", 100), None);
}
