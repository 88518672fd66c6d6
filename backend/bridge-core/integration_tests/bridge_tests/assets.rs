use crate::bridge_tests::helpers::{app_js, paired_client, start_test_bridge, unpaired_client};

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, IF_MODIFIED_SINCE, LAST_MODIFIED, RANGE};

/// **VALUE**: The paired window can load the app's entry page and scripts.
///
/// **WHY THIS MATTERS**: This is the first request the host window makes. If it
/// fails the application shows a blank page.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The server binds but the router never reaches the asset fallback
/// - "/" is not mapped to index.html
/// - JavaScript is served with a type browsers refuse to execute
#[tokio::test]
async fn given_paired_client_when_requesting_assets_then_served_with_types() {
    // GIVEN: A running bridge over the test tree
    let bridge = start_test_bridge().await;
    let client = paired_client();

    // WHEN: Loading the entry page and a script
    let index = client.get(bridge.url("/")).send().await.unwrap();
    let script = client.get(bridge.url("/assets/app.js")).send().await.unwrap();

    // THEN: Both succeed with the right content types
    assert_eq!(index.status(), StatusCode::OK);
    assert_eq!(index.headers()[CONTENT_TYPE], "text/html;charset=utf-8");
    assert_eq!(script.status(), StatusCode::OK);
    assert_eq!(script.headers()[CONTENT_TYPE], "text/javascript;charset=utf-8");
    assert_eq!(script.bytes().await.unwrap().to_vec(), app_js());

    bridge.handle.shutdown().await.unwrap();
}

/// **VALUE**: Any client that is not the paired window is refused.
///
/// **WHY THIS MATTERS**: The server is on loopback, reachable by every local
/// process and by web pages in other browsers.
#[tokio::test]
async fn given_unpaired_client_when_requesting_asset_then_forbidden() {
    let bridge = start_test_bridge().await;

    let response = unpaired_client()
        .get(bridge.url("/index.html"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn given_missing_path_when_requested_then_not_found() {
    let bridge = start_test_bridge().await;

    let response = paired_client()
        .get(bridge.url("/assets/missing.js"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// **VALUE**: Revalidation with the served Last-Modified answers 304; an older
/// date gets the full body.
///
/// **BUG THIS CATCHES**: Would catch comparing sub-second filesystem times with
/// whole-second HTTP dates, which makes every revalidation a full download.
#[tokio::test]
async fn given_last_modified_when_revalidating_then_not_modified() {
    // GIVEN: The Last-Modified of a first response
    let bridge = start_test_bridge().await;
    let client = paired_client();
    let first = client.get(bridge.url("/assets/app.js")).send().await.unwrap();
    let last_modified = first.headers()[LAST_MODIFIED].to_str().unwrap().to_string();

    // WHEN: Revalidating with it
    let revalidated = client
        .get(bridge.url("/assets/app.js"))
        .header(IF_MODIFIED_SINCE, &last_modified)
        .send()
        .await
        .unwrap();

    // THEN: 304 and no body
    assert_eq!(revalidated.status(), StatusCode::NOT_MODIFIED);
    assert!(revalidated.bytes().await.unwrap().is_empty());

    // WHEN: Revalidating with an older date
    let older = httpdate::parse_http_date(&last_modified).unwrap() - Duration::from_secs(60);
    let stale = client
        .get(bridge.url("/assets/app.js"))
        .header(IF_MODIFIED_SINCE, httpdate::fmt_http_date(older))
        .send()
        .await
        .unwrap();

    // THEN: Full response
    assert_eq!(stale.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_ranges_when_requested_then_partial_or_unsatisfiable() {
    let bridge = start_test_bridge().await;
    let client = paired_client();

    let partial = client
        .get(bridge.url("/assets/app.js"))
        .header(RANGE, "bytes=-10")
        .send()
        .await
        .unwrap();
    assert_eq!(partial.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(partial.headers()[CONTENT_RANGE], "bytes 990-999/1000");
    assert_eq!(partial.headers()[CONTENT_LENGTH], "10");
    assert_eq!(partial.bytes().await.unwrap().to_vec(), app_js()[990..].to_vec());

    let unsatisfiable = client
        .get(bridge.url("/assets/app.js"))
        .header(RANGE, "bytes=5000-")
        .send()
        .await
        .unwrap();
    assert_eq!(unsatisfiable.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(unsatisfiable.headers()[CONTENT_RANGE], "bytes */1000");
}

/// **VALUE**: After shutdown the port stops accepting requests.
///
/// **BUG THIS CATCHES**: Would catch a shutdown that returns while the server
/// task keeps listening, leaking the port for the rest of the process.
#[tokio::test]
async fn given_running_bridge_when_shut_down_then_requests_fail() {
    // GIVEN: A bridge that answered once
    let bridge = start_test_bridge().await;
    let url = bridge.url("/index.html");
    let client = paired_client();
    assert!(client.get(&url).send().await.is_ok());

    // WHEN: Shutting it down
    bridge.handle.shutdown().await.unwrap();

    // THEN: Connections are refused
    let after = reqwest::Client::new()
        .get(&url)
        .timeout(Duration::from_secs(2))
        .send()
        .await;
    assert!(after.is_err());
}
