use bridge_core::ASSET_SALT;
use bridge_core::error::resource::ResourceError;
use bridge_core::pack::{DEFLATE_LEVEL, pack_directory};
use bridge_core::resource::{MountRegistry, ResourceProvider};

use std::fs;
use std::io::Read;
use std::path::Path;

use tempfile::TempDir;
use zip::CompressionMethod;

fn build_tree(root: &Path) {
    fs::create_dir_all(root.join("assets/img")).unwrap();
    fs::write(root.join("index.html"), "<!doctype html>".repeat(40)).unwrap();
    fs::write(root.join("assets/app.js"), "console.log('squoosh');\n".repeat(100)).unwrap();
    fs::write(root.join("assets/img/logo.png"), vec![7u8; 4096]).unwrap();
    fs::write(root.join("assets/tiny.css"), "a{}").unwrap();
}

fn read_all(provider: &ResourceProvider, logical: &str) -> Result<Vec<u8>, ResourceError> {
    let mut reader = provider.open(&provider.transform_path(logical))?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).unwrap();
    Ok(bytes)
}

/// **VALUE**: Packed content reads back byte-for-byte through the obfuscated
/// provider.
///
/// **WHY THIS MATTERS**: Release builds serve only from the archive; if the
/// packager and the provider disagree on tokens, the app ships with no assets.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Logical paths use OS separators on one side and '/' on the other
/// - A leading '/' changes the token
/// - Compressed entries fail to inflate
#[test]
fn given_packed_tree_when_read_through_obfuscated_archive_then_bytes_match() {
    // GIVEN: A built frontend packed with the shared salt
    let source = TempDir::new().unwrap();
    build_tree(source.path());
    let out = TempDir::new().unwrap();
    let archive = out.path().join("squoosh.pak");

    // WHEN: Packing and opening it for serving
    let report = pack_directory(source.path(), &archive, ASSET_SALT).unwrap();
    let provider = ResourceProvider::obfuscated_archive(&archive, ASSET_SALT).unwrap();

    // THEN: Every file reads back unchanged, with or without a leading '/'
    assert_eq!(report.entries.len(), 4);
    for logical in ["index.html", "assets/app.js", "assets/img/logo.png", "assets/tiny.css"] {
        let expected = fs::read(source.path().join(logical)).unwrap();
        assert_eq!(read_all(&provider, logical).unwrap(), expected, "{logical}");
        assert_eq!(read_all(&provider, &format!("/{logical}")).unwrap(), expected);
    }
    assert_eq!(
        provider.stat(&provider.transform_path("assets/app.js")).unwrap().size,
        2400
    );
}

#[test]
fn given_packed_tree_when_inspecting_report_then_compression_chosen_per_file() {
    let source = TempDir::new().unwrap();
    build_tree(source.path());
    let out = TempDir::new().unwrap();

    let report = pack_directory(source.path(), &out.path().join("squoosh.pak"), ASSET_SALT).unwrap();

    let method = |path: &str| report.find(path).unwrap().method;
    let level = |path: &str| report.find(path).unwrap().compression_level;
    assert_eq!(method("assets/app.js"), CompressionMethod::Deflated);
    assert_eq!(method("assets/img/logo.png"), CompressionMethod::Stored);
    assert_eq!(method("assets/tiny.css"), CompressionMethod::Stored);
    assert_eq!(level("assets/app.js"), Some(DEFLATE_LEVEL));
    assert_eq!(level("index.html"), Some(DEFLATE_LEVEL));
    assert_eq!(level("assets/img/logo.png"), None);
    assert!(report.find("assets/app.js").unwrap().compressed_size < 2400);
    assert!(report.archive_size > 0);
}

/// **VALUE**: Archive entry names are tokens, never the logical paths.
///
/// **BUG THIS CATCHES**: Would catch a packager that writes plain names, which
/// the obfuscated provider can never find.
#[test]
fn given_packed_tree_when_opened_with_other_salt_or_plain_names_then_not_found() {
    let source = TempDir::new().unwrap();
    build_tree(source.path());
    let out = TempDir::new().unwrap();
    let archive = out.path().join("squoosh.pak");
    pack_directory(source.path(), &archive, ASSET_SALT).unwrap();

    let other_salt = ResourceProvider::obfuscated_archive(&archive, b"other-salt").unwrap();
    let plain = ResourceProvider::archive(&archive).unwrap();

    assert!(matches!(
        read_all(&other_salt, "index.html"),
        Err(ResourceError::NotFound { .. })
    ));
    assert!(!plain.exists("index.html"));
}

#[test]
fn given_archive_mounted_under_prefix_when_resolving_then_tokens_match() {
    let source = TempDir::new().unwrap();
    build_tree(source.path());
    let out = TempDir::new().unwrap();
    let archive = out.path().join("squoosh.pak");
    pack_directory(source.path(), &archive, ASSET_SALT).unwrap();
    let mounts = MountRegistry::new();
    mounts.mount(
        "/",
        ResourceProvider::obfuscated_archive(&archive, ASSET_SALT).unwrap(),
    );

    let resolved = mounts.resolve("/assets/app.js").unwrap();

    assert_eq!(resolved.provider.kind(), "obfuscated-archive");
    assert!(mounts.resolve("/assets/nope.js").is_err());
}
