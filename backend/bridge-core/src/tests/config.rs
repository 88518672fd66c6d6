use crate::config::{BridgeConfig, resolve_against};
use crate::error::config::ConfigError;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

#[test]
fn given_defaults_when_inspected_then_values_match_layout() {
    let config = BridgeConfig::default();

    assert_eq!(config.version, 1);
    assert_eq!(config.server.port, 0);
    assert_eq!(config.assets.mount_prefix, "/");
    assert_eq!(config.assets.archive, PathBuf::from("squoosh.pak"));
    assert_eq!(config.tools.bin_dir, PathBuf::from("bin"));
    assert!(config.tools.scratch_dir.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn given_missing_file_when_loading_then_defaults() {
    let dir = TempDir::new().unwrap();

    let config = BridgeConfig::load(dir.path()).unwrap();

    assert_eq!(config, BridgeConfig::default());
}

/// **VALUE**: Saved settings load back unchanged, and no temp file remains.
///
/// **BUG THIS CATCHES**: Would catch a save that leaves `config.json.tmp`
/// behind or skips the rename.
#[test]
fn given_custom_config_when_saved_and_loaded_then_round_trips() {
    // GIVEN: Non-default settings
    let dir = TempDir::new().unwrap();
    let mut config = BridgeConfig::default();
    config.server.port = 8765;
    config.assets.mount_prefix = "/app/".to_string();
    config.tools.scratch_dir = Some(PathBuf::from("/var/tmp/squoosh"));

    // WHEN
    config.save(dir.path()).unwrap();
    let loaded = BridgeConfig::load(dir.path()).unwrap();

    // THEN
    assert_eq!(loaded, config);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn given_partial_file_when_loading_then_missing_sections_default() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.json"), r#"{ "server": { "port": 9000 } }"#).unwrap();

    let config = BridgeConfig::load(dir.path()).unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.assets, BridgeConfig::default().assets);
}

#[test]
fn given_corrupt_file_when_loading_then_parse_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    let result = BridgeConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: A mount prefix without a leading '/' is rejected at load time.
///
/// **WHY THIS MATTERS**: Request paths always start with '/', so such a prefix
/// would silently never match and every asset would 404.
#[test]
fn given_relative_mount_prefix_when_loading_then_validation_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.json"),
        r#"{ "assets": { "mount_prefix": "static/" } }"#,
    )
    .unwrap();

    let result = BridgeConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn given_future_version_when_validating_then_validation_error() {
    let mut config = BridgeConfig::default();
    config.version = 2;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn given_relative_and_absolute_paths_when_resolving_then_only_relative_joined() {
    let base = Path::new("/opt/squoosh");
    let absolute = std::env::temp_dir();

    assert_eq!(
        resolve_against(base, Path::new("bin")),
        PathBuf::from("/opt/squoosh/bin")
    );
    assert_eq!(resolve_against(base, &absolute), absolute);
}
