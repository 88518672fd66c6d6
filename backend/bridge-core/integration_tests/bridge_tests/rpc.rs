use crate::bridge_tests::helpers::{call_rpc, paired_client, start_test_bridge, unpaired_client};

use bridge_core::RPC_CONTENT_TYPE;
use bridge_core::codec::ImageData;
use bridge_core::rpc::Envelope;

use std::collections::BTreeMap;
use std::fs;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_bytes::ByteBuf;
use serde_json::{Value, json};

/// **VALUE**: A registered function round-trips its value in the success envelope.
///
/// **WHY THIS MATTERS**: Every host call the frontend makes goes through this
/// path; a broken envelope breaks all of them at once.
#[tokio::test]
async fn given_registered_function_when_posted_then_success_envelope() {
    let bridge = start_test_bridge().await;

    let envelope = call_rpc(&bridge, "echo", &("squoosh",)).await;

    assert_eq!(envelope.value::<String>().unwrap(), "squoosh");
}

#[tokio::test]
async fn given_unknown_function_or_wrong_content_type_when_posted_then_http_errors() {
    let bridge = start_test_bridge().await;
    let client = paired_client();

    let unknown = client
        .post(bridge.url("/api/doesNotExist"))
        .header(CONTENT_TYPE, "text/plain")
        .body("[]")
        .send()
        .await
        .unwrap();
    let wrong_type = client
        .post(bridge.url("/api/echo"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"["x"]"#)
        .send()
        .await
        .unwrap();

    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    assert_eq!(wrong_type.status(), StatusCode::BAD_REQUEST);
}

/// **VALUE**: writeFile then readFile moves bytes to disk and back unchanged.
///
/// **BUG THIS CATCHES**: Would catch binary payloads being sent as msgpack
/// arrays of integers instead of bin, or truncated on the way.
#[tokio::test]
async fn given_bytes_when_written_and_read_back_then_identical() {
    // GIVEN: A target path inside the bridge's content dir
    let bridge = start_test_bridge().await;
    let target = bridge.content.path().join("saved.bin");
    let file = target.to_string_lossy().into_owned();
    let payload = ByteBuf::from(vec![0u8, 1, 2, 254, 255]);

    // WHEN: Writing and then reading with and without a limit
    let written = call_rpc(&bridge, "writeFile", &(file.as_str(), &payload)).await;
    let whole = call_rpc(&bridge, "readFile", &(file.as_str(),)).await;
    let head = call_rpc(&bridge, "readFile", &(file.as_str(), 2)).await;

    // THEN
    assert!(matches!(written, Envelope::Success(_)));
    assert_eq!(fs::read(&target).unwrap(), payload.to_vec());
    assert_eq!(whole.value::<ByteBuf>().unwrap(), payload);
    assert_eq!(head.value::<ByteBuf>().unwrap().as_ref(), &[0u8, 1]);
}

/// **VALUE**: A failing host call reports a failure envelope and leaves the
/// server healthy.
///
/// **WHY THIS MATTERS**: The frontend shows the kind and message to the user;
/// a transport error instead would be reported as "server unreachable".
#[tokio::test]
async fn given_missing_file_when_read_then_failure_envelope_and_server_still_serves() {
    let bridge = start_test_bridge().await;
    let missing = bridge.content.path().join("missing.bin");

    let envelope = call_rpc(&bridge, "readFile", &(missing.to_string_lossy(),)).await;

    match envelope {
        Envelope::Failure { kind, .. } => assert_eq!(kind, "NotFound"),
        other => panic!("Expected failure envelope, got {other:?}"),
    }
    let again = call_rpc(&bridge, "echo", &("still here",)).await;
    assert_eq!(again.value::<String>().unwrap(), "still here");
}

/// **VALUE**: An encode whose tool is missing fails cleanly and removes its
/// temporary files.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The input PNG is left in the scratch dir when the encoder fails to start
/// - The spawn failure escapes as a transport error instead of an envelope
#[tokio::test]
async fn given_missing_encoder_when_compressing_then_failure_and_scratch_left_empty() {
    // GIVEN: A 2x2 image and an oxiPNG state, with an empty tools dir
    let bridge = start_test_bridge().await;
    let image = ImageData {
        width: 2,
        height: 2,
        data: ByteBuf::from(vec![128u8; 16]),
    };
    let state = json!({ "type": "oxiPNG", "options": { "level": 2, "interlace": false } });

    // WHEN
    let envelope = call_rpc(&bridge, "compressImage", &(image, state)).await;

    // THEN: Spawn failure reported, nothing left behind
    match envelope {
        Envelope::Failure { kind, .. } => assert_eq!(kind, "ToolSpawnError"),
        other => panic!("Expected failure envelope, got {other:?}"),
    }
    assert_eq!(fs::read_dir(bridge.scratch_path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_no_metric_tools_when_calculating_metrics_then_every_score_is_nil() {
    let bridge = start_test_bridge().await;
    let image = ImageData {
        width: 1,
        height: 1,
        data: ByteBuf::from(vec![10u8, 20, 30, 255]),
    };

    let envelope = call_rpc(&bridge, "calculateMetrics", &(image.clone(), image)).await;

    let scores: Option<BTreeMap<String, Option<f64>>> = envelope.value().unwrap();
    let scores = scores.expect("Uncontended call should not return the default");
    assert_eq!(scores.len(), 3);
    assert!(scores.values().all(Option::is_none));
}

/// **VALUE**: Capability probes answer as JSON maps keyed by tool name.
///
/// **BUG THIS CATCHES**: Would catch the direct route falling through to the
/// asset handler, or probes returning a list instead of a map.
#[tokio::test]
async fn given_direct_probes_when_posted_then_json_maps() {
    let bridge = start_test_bridge().await;
    let client = paired_client();

    let codecs: Value = client
        .post(bridge.url("/direct/checkCodec"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let metrics: Value = client
        .post(bridge.url("/direct/checkMetric"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let unknown = client
        .post(bridge.url("/direct/checkEverything"))
        .send()
        .await
        .unwrap();

    assert_eq!(codecs["mozJPEG"], Value::Null);
    assert_eq!(codecs.as_object().unwrap().len(), 7);
    assert_eq!(metrics, json!({ "butteraugli": false, "dssim": false, "ssimulacra2": false }));
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

/// **VALUE**: Host calls are refused for clients that do not present the token.
///
/// **WHY THIS MATTERS**: readFile and writeFile touch arbitrary paths; any
/// local process or rebound web page could otherwise use them.
///
/// **BUG THIS CATCHES**: Would catch the token check living only in the asset
/// handler while `/api` and `/direct` dispatch unconditionally.
#[tokio::test]
async fn given_unpaired_client_when_posting_rpc_then_forbidden() {
    // GIVEN: A secret file and a target the stranger wants to create
    let bridge = start_test_bridge().await;
    let secret = bridge.content.path().join("secret.txt");
    fs::write(&secret, "top-secret").unwrap();
    let planted = bridge.content.path().join("planted.txt");
    let stranger = unpaired_client();

    // WHEN: The stranger calls readFile, writeFile and a direct probe
    let read = stranger
        .post(bridge.url("/api/readFile"))
        .header(CONTENT_TYPE, RPC_CONTENT_TYPE)
        .body(rmp_serde::to_vec_named(&(secret.to_string_lossy(),)).unwrap())
        .send()
        .await
        .unwrap();
    let write = stranger
        .post(bridge.url("/api/writeFile"))
        .header(CONTENT_TYPE, RPC_CONTENT_TYPE)
        .body(rmp_serde::to_vec_named(&(planted.to_string_lossy(), ByteBuf::from(b"x".to_vec()))).unwrap())
        .send()
        .await
        .unwrap();
    let probe = stranger
        .post(bridge.url("/direct/checkCodec"))
        .send()
        .await
        .unwrap();

    // THEN: All are 403, nothing leaks and nothing is written
    assert_eq!(read.status(), StatusCode::FORBIDDEN);
    assert!(!read.text().await.unwrap().contains("top-secret"));
    assert_eq!(write.status(), StatusCode::FORBIDDEN);
    assert!(!planted.exists(), "Refused writeFile must not touch the disk");
    assert_eq!(probe.status(), StatusCode::FORBIDDEN);

    // AND: The paired window is still served
    let envelope = call_rpc(&bridge, "echo", &("still here",)).await;
    assert_eq!(envelope.value::<String>().unwrap(), "still here");
}

/// **VALUE**: An unknown direct function is 404 whatever its body holds.
///
/// **BUG THIS CATCHES**: Would catch arguments being parsed before the name
/// lookup, turning a typo'd function name into a misleading 400.
#[tokio::test]
async fn given_malformed_body_for_unknown_direct_function_when_posted_then_not_found() {
    let bridge = start_test_bridge().await;
    let client = paired_client();

    let unknown = client
        .post(bridge.url("/direct/checkEverything"))
        .body("{not json")
        .send()
        .await
        .unwrap();
    let malformed = client
        .post(bridge.url("/direct/checkCodec"))
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}
