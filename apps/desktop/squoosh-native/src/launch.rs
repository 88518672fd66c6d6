//! Startup wiring: launch mode, platform directories, asset mounts and the
//! bridge state handed to the server.

use crate::error::HostError;

use bridge_core::ASSET_SALT;
use bridge_core::api::{register_api, register_direct};
use bridge_core::codec::Toolbox;
use bridge_core::config::{BridgeConfig, resolve_against};
use bridge_core::error::{ConfigError, ResourceError};
use bridge_core::resource::{MountRegistry, ResourceProvider};
use bridge_core::rpc::{DirectRegistry, RpcRegistry};
use bridge_core::server::BridgeState;

use common::{ClientToken, ErrorLocation};

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

pub const APP_DIR_NAME: &str = "squoosh-native";
pub const DEBUG_ENV: &str = "DEBUG";
/// Pins the client token instead of generating one per launch.
pub const CLIENT_TOKEN_ENV: &str = "SQUOOSH_CLIENT_TOKEN";
/// Replaces the platform data directory (logs).
pub const DATA_DIR_ENV: &str = "SQUOOSH_DATA_DIR";

const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Serve the frontend build tree from disk.
    Debug,
    /// Serve the obfuscated archive shipped next to the executable.
    Packaged,
}

impl LaunchMode {
    pub fn from_env() -> Self {
        Self::select(env::var(DEBUG_ENV).ok().as_deref(), cfg!(debug_assertions))
    }

    /// Debug mode needs both a non-empty `DEBUG` and a debug build; a release
    /// build always serves the archive.
    pub fn select(debug_var: Option<&str>, debug_build: bool) -> Self {
        if debug_build && debug_var.is_some_and(|value| !value.is_empty()) {
            LaunchMode::Debug
        } else {
            LaunchMode::Packaged
        }
    }
}

/// Attempts to load `.env` from the current directory, then from the
/// executable's directory.
pub fn load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {}", path.display());
        return Some(path);
    }

    let env_path = env::current_exe().ok()?.parent()?.join(".env");
    if !env_path.exists() {
        return None;
    }
    match dotenvy::from_path(&env_path) {
        Ok(()) => {
            info!("Loaded .env from: {}", env_path.display());
            Some(env_path)
        }
        Err(e) => {
            warn!("Failed to parse .env at {}: {e}", env_path.display());
            None
        }
    }
}

/// Directory relative asset and tool paths resolve against: the executable's
/// directory when packaged, the working directory in debug mode.
#[track_caller]
pub fn content_dir(mode: LaunchMode) -> Result<PathBuf, HostError> {
    let dir = match mode {
        LaunchMode::Debug => env::current_dir(),
        LaunchMode::Packaged => env::current_exe().and_then(|exe| {
            exe.parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| std::io::Error::other("executable has no parent directory"))
        }),
    };

    dir.map_err(|e| HostError::Host {
        message: format!("Failed to determine content directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// `<platform config dir>/squoosh-native`.
#[track_caller]
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
            reason: "platform has no config directory".to_string(),
        })
}

/// `$SQUOOSH_DATA_DIR/logs` if set, else `<platform data dir>/squoosh-native/logs`.
#[track_caller]
pub fn log_dir() -> Result<PathBuf, HostError> {
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir).join(LOG_DIR_NAME));
    }

    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(LOG_DIR_NAME))
        .ok_or_else(|| HostError::Host {
            message: "platform has no local data directory".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// The token the paired window must present as its user agent.
pub fn client_token() -> ClientToken {
    match env::var(CLIENT_TOKEN_ENV) {
        Ok(pinned) if !pinned.is_empty() => {
            info!("Using client token from {CLIENT_TOKEN_ENV}");
            ClientToken::new(pinned)
        }
        _ => ClientToken::new(Uuid::new_v4().to_string()),
    }
}

/// Mount the frontend under `assets.mount_prefix`.
///
/// # Errors
///
/// Returns [`ResourceError::ProviderInit`] when the debug root or the archive
/// is missing or unreadable.
pub fn mount_assets(
    mounts: &MountRegistry,
    mode: LaunchMode,
    config: &BridgeConfig,
    content_dir: &Path,
) -> Result<(), ResourceError> {
    let provider = match mode {
        LaunchMode::Debug => {
            let root = resolve_against(content_dir, &config.assets.debug_root);
            info!("Debug mode: serving frontend from {}", root.display());
            ResourceProvider::local(root)?
        }
        LaunchMode::Packaged => {
            let archive = resolve_against(content_dir, &config.assets.archive);
            info!("Serving frontend from {}", archive.display());
            ResourceProvider::obfuscated_archive(archive, ASSET_SALT)?
        }
    };

    mounts.mount(config.assets.mount_prefix.clone(), provider);
    Ok(())
}

/// Everything the bridge server needs: mounts, host API and access token.
///
/// # Errors
///
/// Returns [`HostError`] if the assets cannot be mounted or the host API
/// cannot be registered.
pub fn bridge_state(
    mode: LaunchMode,
    config: &BridgeConfig,
    content_dir: &Path,
    token: ClientToken,
) -> Result<BridgeState, HostError> {
    let mounts = MountRegistry::new();
    mount_assets(&mounts, mode, config, content_dir)?;

    let bin_dir = resolve_against(content_dir, &config.tools.bin_dir);
    let scratch_dir = config
        .tools
        .scratch_dir
        .as_deref()
        .map(|dir| resolve_against(content_dir, dir));
    debug!("Tools directory: {}", bin_dir.display());
    let toolbox = Arc::new(Toolbox::new(bin_dir, scratch_dir));

    let mut rpc = RpcRegistry::new();
    register_api(&mut rpc, Arc::clone(&toolbox))?;
    let mut direct = DirectRegistry::new();
    register_direct(&mut direct, toolbox);

    Ok(BridgeState::new(Arc::new(mounts), token, rpc, direct))
}
