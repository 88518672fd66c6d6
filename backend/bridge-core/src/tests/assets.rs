use crate::error::asset::AssetError;
use crate::resource::{MountRegistry, ResourceProvider};
use crate::server::AccessPolicy;
use crate::server::assets::AssetServer;

use common::ClientToken;

use std::fs;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use axum::body::to_bytes;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::Response;
use tempfile::TempDir;

const TOKEN: &str = "paired-window-token";

struct Fixture {
    _dir: TempDir,
    server: AssetServer,
    modified: SystemTime,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let payload: Vec<u8> = (0..100u8).collect();
    fs::write(dir.path().join("data.bin"), &payload).unwrap();
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/index.html"), "<h1>docs</h1>").unwrap();
    let modified = fs::metadata(dir.path().join("data.bin"))
        .unwrap()
        .modified()
        .unwrap();

    let mounts = MountRegistry::new();
    mounts.mount("/", ResourceProvider::local(dir.path()).unwrap());
    let server = AssetServer::new(Arc::new(mounts), AccessPolicy::new(ClientToken::new(TOKEN)));

    Fixture {
        _dir: dir,
        server,
        modified,
    }
}

fn headers(extra: &[(header::HeaderName, String)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(TOKEN));
    for (name, value) in extra {
        headers.insert(name.clone(), HeaderValue::from_str(value).unwrap());
    }
    headers
}

async fn body(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

fn header_str<'a>(response: &'a Response, name: header::HeaderName) -> &'a str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

/// **VALUE**: A plain GET returns the whole file with cache and range headers.
///
/// **BUG THIS CATCHES**: Would catch a missing Last-Modified, which disables
/// the browser's conditional requests entirely.
#[tokio::test]
async fn given_existing_file_when_get_then_full_body_with_headers() {
    // GIVEN: A 100-byte file
    let fixture = fixture();

    // WHEN: Requesting it
    let response = fixture
        .server
        .respond(&Method::GET, "/data.bin", &headers(&[]))
        .unwrap();

    // THEN: 200 with all bytes and the expected headers
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_LENGTH), "100");
    assert_eq!(header_str(&response, header::ACCEPT_RANGES), "bytes");
    assert_eq!(
        header_str(&response, header::LAST_MODIFIED),
        httpdate::fmt_http_date(fixture.modified)
    );
    assert_eq!(body(response).await, (0..100u8).collect::<Vec<_>>());
}

/// **VALUE**: Conditional requests compare at whole-second precision.
///
/// **WHY THIS MATTERS**: HTTP dates carry no sub-second part. Comparing raw
/// filesystem times would make every revalidation miss and re-send the file.
#[tokio::test]
async fn given_if_modified_since_when_not_older_then_not_modified_else_full_body() {
    let fixture = fixture();
    let current = httpdate::fmt_http_date(fixture.modified);
    let stale = httpdate::fmt_http_date(fixture.modified - Duration::from_secs(1));

    // WHEN: The client's copy is as new as the file
    let fresh = fixture
        .server
        .respond(
            &Method::GET,
            "/data.bin",
            &headers(&[(header::IF_MODIFIED_SINCE, current)]),
        )
        .unwrap();

    // THEN: 304 with an empty body
    assert_eq!(fresh.status(), StatusCode::NOT_MODIFIED);
    assert!(fresh.headers().contains_key(header::DATE));
    assert!(body(fresh).await.is_empty());

    // WHEN: The client's copy is a second older
    let outdated = fixture
        .server
        .respond(
            &Method::GET,
            "/data.bin",
            &headers(&[(header::IF_MODIFIED_SINCE, stale)]),
        )
        .unwrap();

    // THEN: Full response
    assert_eq!(outdated.status(), StatusCode::OK);
    assert_eq!(body(outdated).await.len(), 100);
}

#[tokio::test]
async fn given_satisfiable_range_when_get_then_partial_content() {
    let fixture = fixture();

    let response = fixture
        .server
        .respond(
            &Method::GET,
            "/data.bin",
            &headers(&[(header::RANGE, "bytes=10-20".to_string())]),
        )
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(header_str(&response, header::CONTENT_RANGE), "bytes 10-20/100");
    assert_eq!(header_str(&response, header::CONTENT_LENGTH), "11");
    assert_eq!(body(response).await, (10..=20u8).collect::<Vec<_>>());
}

/// **VALUE**: A range past the end is refused rather than clamped to nothing.
///
/// **BUG THIS CATCHES**: Would catch answering 206 with an empty or negative
/// window, which media elements treat as a corrupt stream.
#[tokio::test]
async fn given_unsatisfiable_range_when_get_then_range_not_satisfiable() {
    let fixture = fixture();

    let result = fixture.server.respond(
        &Method::GET,
        "/data.bin",
        &headers(&[(header::RANGE, "bytes=200-300".to_string())]),
    );

    let error = result.unwrap_err();
    assert!(matches!(error, AssetError::RangeNotSatisfiable { size: 100, .. }));
    assert_eq!(error.status_code(), StatusCode::RANGE_NOT_SATISFIABLE);
}

/// **VALUE**: Requests without the client token are refused, even for files
/// that exist.
///
/// **WHY THIS MATTERS**: The bridge listens on loopback where any local
/// process can connect; the token is what pairs it to the host window.
#[tokio::test]
async fn given_wrong_or_missing_user_agent_when_get_then_forbidden() {
    let fixture = fixture();
    let mut wrong = HeaderMap::new();
    wrong.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));

    let with_wrong = fixture.server.respond(&Method::GET, "/data.bin", &wrong);
    let with_none = fixture
        .server
        .respond(&Method::GET, "/data.bin", &HeaderMap::new());
    let missing_file = fixture.server.respond(&Method::GET, "/nope.bin", &wrong);

    assert!(matches!(with_wrong, Err(AssetError::Forbidden { .. })));
    assert!(matches!(with_none, Err(AssetError::Forbidden { .. })));
    // Access is checked before resolution
    assert!(matches!(missing_file, Err(AssetError::Forbidden { .. })));
}

#[tokio::test]
async fn given_missing_file_when_get_then_not_found() {
    let fixture = fixture();

    let result = fixture
        .server
        .respond(&Method::GET, "/nope.bin", &headers(&[]));

    assert!(matches!(result, Err(AssetError::NotFound { .. })));
}

#[tokio::test]
async fn given_post_when_responding_then_method_not_allowed() {
    let fixture = fixture();

    let result = fixture
        .server
        .respond(&Method::POST, "/data.bin", &headers(&[]));

    assert!(matches!(result, Err(AssetError::MethodNotAllowed { .. })));
}

#[tokio::test]
async fn given_head_when_responding_then_headers_without_body() {
    let fixture = fixture();

    let response = fixture
        .server
        .respond(&Method::HEAD, "/data.bin", &headers(&[]))
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_LENGTH), "100");
    assert!(body(response).await.is_empty());
}

/// **VALUE**: Directory URLs serve their index document.
///
/// **BUG THIS CATCHES**: Would catch resolving "docs/" literally, which no
/// provider has, so the app's entry page would 404.
#[tokio::test]
async fn given_trailing_slash_when_get_then_index_document_served_as_html() {
    let fixture = fixture();

    let response = fixture
        .server
        .respond(&Method::GET, "/docs/", &headers(&[]))
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_str(&response, header::CONTENT_TYPE),
        "text/html;charset=utf-8"
    );
    assert_eq!(body(response).await, b"<h1>docs</h1>");
}

#[tokio::test]
async fn given_percent_encoded_path_when_get_then_decoded_before_resolution() {
    let fixture = fixture();

    let response = fixture
        .server
        .respond(&Method::GET, "/docs/%69ndex.html", &headers(&[]))
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// **VALUE**: Large files and archive entries serve exact byte windows.
///
/// **WHY THIS MATTERS**: Disk files are streamed in chunks rather than read
/// whole, so the window bound has to hold across chunk boundaries.
///
/// **BUG THIS CATCHES**: Would catch a stream that ignores the seek or the
/// length bound and sends the rest of the file, and an archive slice that is
/// off by one at either end.
#[tokio::test]
async fn given_multi_chunk_file_and_archive_entry_when_ranged_then_exact_window_served() {
    // GIVEN: A 1 MiB file on disk and the same bytes as a zip entry
    let dir = TempDir::new().unwrap();
    let payload: Vec<u8> = (0..(1 << 20)).map(|i: u32| (i % 251) as u8).collect();
    fs::write(dir.path().join("big.bin"), &payload).unwrap();
    let archive_path = dir.path().join("big.zip");
    let mut writer = zip::ZipWriter::new(fs::File::create(&archive_path).unwrap());
    writer
        .start_file("big.bin", zip::write::SimpleFileOptions::default())
        .unwrap();
    std::io::Write::write_all(&mut writer, &payload).unwrap();
    writer.finish().unwrap();

    let mounts = MountRegistry::new();
    mounts.mount("/disk/", ResourceProvider::local(dir.path()).unwrap());
    mounts.mount("/zip/", ResourceProvider::archive(&archive_path).unwrap());
    let server = AssetServer::new(Arc::new(mounts), AccessPolicy::new(ClientToken::new(TOKEN)));
    let range = headers(&[(header::RANGE, "bytes=100000-300000".to_string())]);

    // WHEN: Requesting the same window from both, plus the whole disk file
    let from_disk = server.respond(&Method::GET, "/disk/big.bin", &range).unwrap();
    let from_zip = server.respond(&Method::GET, "/zip/big.bin", &range).unwrap();
    let whole = server
        .respond(&Method::GET, "/disk/big.bin", &headers(&[]))
        .unwrap();

    // THEN: Both windows are exactly bytes 100000..=300000
    let expected = &payload[100_000..=300_000];
    assert_eq!(header_str(&from_disk, header::CONTENT_LENGTH), "200001");
    assert_eq!(body(from_disk).await, expected);
    assert_eq!(body(from_zip).await, expected);
    assert_eq!(body(whole).await, payload);
}
