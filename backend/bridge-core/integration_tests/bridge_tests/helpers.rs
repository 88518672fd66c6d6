//! Test helpers for bridge server integration tests.
//!
//! This module provides utilities for testing the loopback bridge:
//! - Building a content tree and mounting it
//! - Starting a server on an ephemeral port
//! - Paired and unpaired HTTP clients
//! - Encoding RPC calls and decoding their envelopes

use bridge_core::RPC_CONTENT_TYPE;
use bridge_core::api::{register_api, register_direct};
use bridge_core::codec::Toolbox;
use bridge_core::config::ServerSettings;
use bridge_core::resource::{MountRegistry, ResourceProvider};
use bridge_core::rpc::{DirectRegistry, Envelope, RpcRegistry};
use bridge_core::server::{BridgeServerHandle, BridgeState, start_bridge_server};

use common::ClientToken;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tempfile::TempDir;

/// Test constant presented as the `User-Agent` by the paired window.
pub const TEST_CLIENT_TOKEN: &str = "test-client-token-12345";

/// Bytes of `app.js` in the test tree.
pub fn app_js() -> Vec<u8> {
    (0..=255u8).cycle().take(1000).collect()
}

/// A running bridge plus the directories backing it.
pub struct TestBridge {
    pub handle: BridgeServerHandle,
    pub content: TempDir,
    pub scratch: TempDir,
    _bin: TempDir,
}

impl TestBridge {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.handle.base_url(), path.trim_start_matches('/'))
    }

    pub fn scratch_path(&self) -> PathBuf {
        self.scratch.path().to_path_buf()
    }
}

/// Test helper: Start a bridge serving a small content tree, with the real
/// host API registered against an empty tools directory.
pub async fn start_test_bridge() -> TestBridge {
    let content = TempDir::new().expect("Failed to create content dir");
    fs::create_dir_all(content.path().join("assets")).expect("Failed to create assets dir");
    fs::write(content.path().join("index.html"), "<!doctype html><title>t</title>")
        .expect("Failed to write index.html");
    fs::write(content.path().join("assets/app.js"), app_js()).expect("Failed to write app.js");

    let bin = TempDir::new().expect("Failed to create bin dir");
    let scratch = TempDir::new().expect("Failed to create scratch dir");

    let mounts = MountRegistry::new();
    mounts.mount(
        "/",
        ResourceProvider::local(content.path()).expect("Failed to open content dir"),
    );

    let toolbox = Arc::new(Toolbox::new(bin.path(), Some(scratch.path().to_path_buf())));
    let mut rpc = RpcRegistry::new();
    register_api(&mut rpc, Arc::clone(&toolbox)).expect("Failed to register API");
    rpc.register("echo", |(value,): (String,)| Ok(value));
    let mut direct = DirectRegistry::new();
    register_direct(&mut direct, toolbox);

    let state = BridgeState::new(
        Arc::new(mounts),
        ClientToken::new(TEST_CLIENT_TOKEN),
        rpc,
        direct,
    );
    let handle = start_bridge_server(&ServerSettings { port: 0 }, state)
        .await
        .expect("Failed to start bridge server");

    TestBridge {
        handle,
        content,
        scratch,
        _bin: bin,
    }
}

/// Test helper: Client that identifies itself with the client token.
pub fn paired_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(TEST_CLIENT_TOKEN)
        .build()
        .expect("Failed to build client")
}

/// Test helper: Client with an ordinary browser user agent.
pub fn unpaired_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0")
        .build()
        .expect("Failed to build client")
}

/// Test helper: POST a binary RPC call and decode the envelope.
pub async fn call_rpc(bridge: &TestBridge, function: &str, args: &impl Serialize) -> Envelope {
    let body = rmp_serde::to_vec_named(args).expect("Failed to encode arguments");
    let response = paired_client()
        .post(bridge.url(&format!("api/{function}")))
        .header(reqwest::header::CONTENT_TYPE, RPC_CONTENT_TYPE)
        .body(body)
        .send()
        .await
        .expect("Failed to send RPC call");
    assert_eq!(response.status(), 200, "RPC transport should succeed");

    let bytes = response.bytes().await.expect("Failed to read envelope");
    Envelope::decode(&bytes).expect("Failed to decode envelope")
}
