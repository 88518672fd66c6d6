use crate::codec::{EncoderState, ImageData, Metric, OptionValue, Toolbox};
use crate::error::codec::CodecError;
use crate::pack::should_store;

use std::env::consts::EXE_SUFFIX;
use std::fs;
use std::path::Path;

use serde_bytes::ByteBuf;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Decode an encoder state the way it arrives over the bridge: msgpack built
/// from the frontend's object.
fn state(value: Value) -> EncoderState {
    let packed = rmp_serde::to_vec(&value).unwrap();
    rmp_serde::from_slice(&packed).unwrap()
}

fn argv(state: &EncoderState) -> Vec<String> {
    state
        .invocation(Path::new("bin"), Path::new("in.png"), Path::new("out.img"))
        .unwrap()
        .arg_strings()
}

#[test]
fn given_option_values_when_displayed_then_command_line_forms() {
    assert_eq!(OptionValue::Bool(true).to_string(), "1");
    assert_eq!(OptionValue::Bool(false).to_string(), "0");
    assert_eq!(OptionValue::Int(-1).to_string(), "-1");
    assert_eq!(OptionValue::Float(75.0).to_string(), "75.0");
    assert_eq!(OptionValue::Float(1.5).to_string(), "1.5");
}

#[test]
fn given_option_values_when_picking_choices_then_out_of_range_is_none() {
    let choices = ["none", "fast", "best"];

    assert_eq!(OptionValue::Int(1).pick(&choices), Some("fast"));
    assert_eq!(OptionValue::Bool(true).pick(&choices), Some("fast"));
    assert_eq!(OptionValue::Int(3).pick(&choices), None);
    assert_eq!(OptionValue::Int(-1).pick(&choices), None);
}

/// **VALUE**: oxiPNG options produce the exact argv the tool expects.
///
/// **BUG THIS CATCHES**: Would catch rendering the interlace flag as "true" or
/// swapping the input and `--out` positions.
#[test]
fn given_oxipng_state_when_building_invocation_then_argv_matches() {
    // GIVEN: Interlace arrives as a boolean
    let state = state(json!({ "type": "oxiPNG", "options": { "level": 2, "interlace": true } }));

    // WHEN
    let args = argv(&state);

    // THEN
    assert_eq!(
        args,
        [
            "--verbose", "--verbose", "--opt", "2", "--interlace", "1", "--strip", "safe",
            "--alpha", "--out", "out.img", "in.png"
        ]
    );
}

/// **VALUE**: pngquant's effort slider maps onto its inverted speed scale.
///
/// **BUG THIS CATCHES**: Would catch passing effort straight through as
/// `--speed`, which makes "more effort" produce faster, worse output.
#[test]
fn given_pngquant_state_when_building_invocation_then_speed_is_inverted_effort() {
    let state = state(json!({
        "type": "pngquant",
        "options": { "quality": 75, "effort": 4, "fs": false, "strip": 1 }
    }));

    let args = argv(&state);

    assert_eq!(
        args,
        [
            "--output", "out.img", "--quality", "0-75", "--speed", "8", "--nofs", "--strip",
            "--verbose", "--", "in.png"
        ]
    );
}

fn avif_options(quality: i64, quality_alpha: i64, subsample: i64) -> Value {
    json!({
        "type": "avif",
        "options": {
            "quality": quality,
            "qualityAlpha": quality_alpha,
            "tileRowsLog2": 0,
            "tileColsLog2": 0,
            "speed": 6,
            "subsample": subsample,
            "chromaDeltaQ": false,
            "sharpness": 0,
            "tune": 0,
            "denoiseLevel": 0,
            "enableSharpYUV": false
        }
    })
}

#[test]
fn given_avif_lossy_state_when_building_invocation_then_alpha_quality_follows_color() {
    let state = state(avif_options(60, -1, 1));

    let args = argv(&state);

    assert_eq!(
        args,
        [
            "--jobs", "all", "--yuv", "420", "--qcolor", "60", "--qalpha", "60", "--advanced",
            "sharpness=0", "--advanced", "tune=ssim", "--advanced",
            "color:denoise-noise-level=0", "--tilerowslog2", "0", "--tilecolslog2", "0",
            "--speed", "6", "--", "in.png", "out.img"
        ]
    );
}

#[test]
fn given_avif_full_quality_444_state_when_building_invocation_then_lossless() {
    let state = state(avif_options(100, 100, 3));

    let args = argv(&state);

    assert!(args.contains(&"--lossless".to_string()));
    assert!(!args.contains(&"--qcolor".to_string()));
    assert_eq!(&args[..4], ["--jobs", "all", "--yuv", "444"]);
}

/// **VALUE**: An out-of-range enumerated option is a typed failure, not a panic.
///
/// **BUG THIS CATCHES**: Would catch indexing the choice table directly, which
/// panics on bad frontend input.
#[test]
fn given_avif_subsample_out_of_range_when_building_invocation_then_invalid_option() {
    let state = state(avif_options(60, -1, 7));

    let result = state.invocation(Path::new("bin"), Path::new("in.png"), Path::new("out.avif"));

    let error = result.unwrap_err();
    assert!(matches!(error, CodecError::InvalidOption { .. }));
    assert_eq!(error.kind(), "InvalidOption");
}

#[test]
fn given_unknown_encoder_type_when_decoding_then_error() {
    let packed = rmp_serde::to_vec(&json!({ "type": "gif", "options": {} })).unwrap();

    let result = rmp_serde::from_slice::<EncoderState>(&packed);

    assert!(result.is_err());
}

#[test]
fn given_metric_outputs_when_parsing_then_scores_extracted() {
    assert_eq!(
        Metric::Dssim.parse_output("0.00123456\tout.png").unwrap(),
        0.00123456
    );
    assert_eq!(
        Metric::Butteraugli
            .parse_output("1.8532\n3-norm: 0.912345")
            .unwrap(),
        0.912345
    );
    assert_eq!(Metric::Ssimulacra2.parse_output("87.25").unwrap(), 87.25);
}

#[test]
fn given_malformed_metric_output_when_parsing_then_parse_error() {
    let missing_norm = Metric::Butteraugli.parse_output("1.8532");
    let garbage = Metric::Ssimulacra2.parse_output("error: bad input");

    assert!(matches!(missing_norm, Err(CodecError::Parse { .. })));
    assert!(matches!(garbage, Err(CodecError::Parse { .. })));
}

/// **VALUE**: Metric availability is presence of the executable file.
///
/// **BUG THIS CATCHES**: Would catch reporting every metric as available,
/// which makes the frontend show scores that always fail.
#[test]
fn given_only_dssim_installed_when_checking_metrics_then_only_dssim_available() {
    // GIVEN: A tools directory holding just a dssim executable
    let bin = TempDir::new().unwrap();
    fs::write(bin.path().join(format!("dssim{EXE_SUFFIX}")), b"").unwrap();
    let toolbox = Toolbox::new(bin.path(), None);

    // WHEN
    let metrics = toolbox.check_metrics();

    // THEN
    assert_eq!(metrics.get("dssim"), Some(&true));
    assert_eq!(metrics.get("butteraugli"), Some(&false));
    assert_eq!(metrics.get("ssimulacra2"), Some(&false));
}

#[test]
fn given_empty_tools_directory_when_checking_codecs_then_every_encoder_unavailable() {
    let bin = TempDir::new().unwrap();
    let toolbox = Toolbox::new(bin.path(), None);

    let codecs = toolbox.check_codecs();

    assert_eq!(codecs.len(), 7);
    assert!(codecs.values().all(Option::is_none));
    assert!(codecs.contains_key("mozJPEG"));
    assert!(codecs.contains_key("pngquant"));
}

/// **VALUE**: Per-call scratch directories live under the configured root and
/// vanish when dropped.
///
/// **WHY THIS MATTERS**: Every encode writes two full-size images; leaking
/// them fills the disk over a long session.
#[test]
fn given_scratch_dir_when_workspace_dropped_then_nothing_left_behind() {
    // GIVEN: A toolbox with an explicit scratch root
    let scratch = TempDir::new().unwrap();
    let toolbox = Toolbox::new("bin", Some(scratch.path().to_path_buf()));

    // WHEN: A workspace is used and dropped
    let workspace = toolbox.workspace().unwrap();
    assert!(workspace.path().starts_with(scratch.path()));
    fs::write(workspace.path().join("input.png"), b"pixels").unwrap();
    drop(workspace);

    // THEN: The scratch root is empty again
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn given_pixel_buffer_of_wrong_length_when_writing_png_then_image_error() {
    let dir = TempDir::new().unwrap();
    let image = ImageData {
        width: 2,
        height: 2,
        data: ByteBuf::from(vec![0u8; 15]),
    };

    let result = image.write_png(&dir.path().join("bad.png"));

    assert!(matches!(result, Err(CodecError::Image { .. })));
}

#[test]
fn given_rgba_pixels_when_writing_png_then_decodes_to_same_pixels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("good.png");
    let pixels: Vec<u8> = (0..24u8).collect();
    let image = ImageData {
        width: 3,
        height: 2,
        data: ByteBuf::from(pixels.clone()),
    };

    image.write_png(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.into_raw(), pixels);
}

#[test]
fn given_packed_file_candidates_when_deciding_storage_then_small_and_precompressed_stored() {
    assert!(should_store(Path::new("icon.png"), 100_000));
    assert!(should_store(Path::new("tiny.js"), 10));
    assert!(!should_store(Path::new("app.js"), 100_000));
    assert!(!should_store(Path::new("codec.wasm"), 256));
}
