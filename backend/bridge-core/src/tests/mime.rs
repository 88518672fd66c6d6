use crate::server::mime::{FALLBACK_MIME, guess};

/// **VALUE**: Script assets are always served as JavaScript.
///
/// **WHY THIS MATTERS**: Browsers refuse module scripts served with the wrong type;
/// some platforms' registries map `.js` to `text/plain`.
#[test]
fn given_script_paths_when_guessed_then_text_javascript_with_charset() {
    assert_eq!(guess("/assets/app.js").content_type(), "text/javascript;charset=utf-8");
    assert_eq!(guess("/worker.mjs").mime, "text/javascript");
}

#[test]
fn given_common_asset_types_when_guessed_then_expected_mime() {
    assert_eq!(guess("/index.html").content_type(), "text/html;charset=utf-8");
    assert_eq!(guess("/style.css").content_type(), "text/css;charset=utf-8");
    assert_eq!(guess("/codec.wasm").mime, "application/wasm");
    assert_eq!(guess("/logo.svg").mime, "image/svg+xml");
    assert_eq!(guess("/icon.png").content_type(), "image/png");
    assert_eq!(guess("/manifest.webmanifest").mime, "application/manifest+json");
}

/// **VALUE**: Pre-compressed assets keep their underlying type and declare the encoding.
///
/// **BUG THIS CATCHES**: Would catch serving `app.js.gz` as `application/gzip`,
/// which the browser would download instead of executing.
#[test]
fn given_compressed_suffix_when_guessed_then_inner_type_and_encoding() {
    let gz = guess("/app.js.gz");
    assert_eq!(gz.mime, "text/javascript");
    assert_eq!(gz.encoding, Some("gzip"));

    let svgz = guess("/logo.svgz");
    assert_eq!(svgz.mime, "image/svg+xml");
    assert_eq!(svgz.encoding, Some("gzip"));

    assert_eq!(guess("/data.json.br").encoding, Some("br"));
    assert_eq!(guess("/index.html").encoding, None);
}

#[test]
fn given_unknown_or_missing_extension_when_guessed_then_octet_stream() {
    assert_eq!(guess("/LICENSE").mime, FALLBACK_MIME);
    assert_eq!(guess("/.hidden").mime, FALLBACK_MIME);
    assert_eq!(guess("/blob.qqqunknown").mime, FALLBACK_MIME);
    assert_eq!(guess("/LICENSE").content_type(), "application/octet-stream");
}
