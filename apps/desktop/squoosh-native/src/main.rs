// Prevents additional console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use squoosh_native::error::HostError;
use squoosh_native::launch::{self, LaunchMode};
use squoosh_native::logger::initialize as LoggerInitialize;

use bridge_core::config::BridgeConfig;
use bridge_core::server::start_bridge_server;

use common::ErrorLocation;

use std::panic::Location;
use std::process::ExitCode;

use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Squoosh Native stopped: {e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), HostError> {
    // Logger FIRST, so .env loading and config are logged
    let log_dir = launch::log_dir()?;
    LoggerInitialize(&log_dir)?;
    launch::load_dotenv();

    info!("Squoosh Native starting");

    let mode = LaunchMode::from_env();
    let content_dir = launch::content_dir(mode)?;
    let config_dir = launch::config_dir()?;
    let config = BridgeConfig::load(&config_dir)?;
    info!("Launch mode: {mode:?}, content directory: {}", content_dir.display());

    let state = launch::bridge_state(mode, &config, &content_dir, launch::client_token())?;
    let handle = start_bridge_server(&config.server, state).await?;
    info!("Frontend available at {}", handle.base_url());

    tokio::signal::ctrl_c().await.map_err(|e| HostError::Host {
        message: format!("Failed to wait for Ctrl-C: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    info!("Shutdown requested");
    handle.shutdown().await?;
    info!("Squoosh Native stopped");
    Ok(())
}
