use squoosh_native::launch::{LaunchMode, bridge_state};

use bridge_core::config::BridgeConfig;
use bridge_core::server::start_bridge_server;

use common::ClientToken;

use std::fs;

use tempfile::TempDir;

const TEST_CLIENT_TOKEN: &str = "host-integration-token";

/// **VALUE**: The host wiring produces a server that serves the frontend to
/// the paired window and refuses everyone else.
///
/// **WHY THIS MATTERS**: This is the path `main` takes: config defaults, debug
/// mount, host API registration, server start. A break anywhere shows up as
/// an empty window.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The token handed to the state is not the one the asset server checks
/// - The debug root is resolved against the wrong directory
/// - Direct capability probes are not registered
#[tokio::test]
async fn given_debug_launch_when_started_then_paired_window_served_and_probes_answer() {
    // GIVEN: A content dir with the default debug build tree
    let content = TempDir::new().unwrap();
    let build = content.path().join("squoosh/.tmp/build/static");
    fs::create_dir_all(&build).unwrap();
    fs::write(build.join("index.html"), "<!doctype html><title>Squoosh</title>").unwrap();
    let config = BridgeConfig::default();

    let state = bridge_state(
        LaunchMode::Debug,
        &config,
        content.path(),
        ClientToken::new(TEST_CLIENT_TOKEN),
    )
    .expect("Failed to build bridge state");
    let handle = start_bridge_server(&config.server, state)
        .await
        .expect("Failed to start bridge server");
    let base_url = handle.base_url();

    // WHEN: The paired window and a stranger load the entry page
    let paired = reqwest::Client::builder()
        .user_agent(TEST_CLIENT_TOKEN)
        .build()
        .unwrap();
    let page = paired.get(&base_url).send().await.unwrap();
    let stranger = reqwest::get(&base_url).await.unwrap();
    let probes = paired
        .post(format!("{base_url}direct/checkMetric"))
        .send()
        .await
        .unwrap();

    // THEN
    assert_eq!(page.status(), 200);
    assert!(page.text().await.unwrap().contains("Squoosh"));
    assert_eq!(stranger.status(), 403);
    assert_eq!(probes.status(), 200);

    handle.shutdown().await.expect("Failed to shut down");
}
