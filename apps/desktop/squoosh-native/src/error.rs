use bridge_core::error::{
    ConfigError, CoreError, PackError, ResourceError, RpcError, ServerError,
};

use common::ErrorLocation;

use thiserror::Error;

/// Errors that stop the host process during startup or shutdown.
///
/// Per-request failures never reach this type; the bridge turns them into
/// HTTP statuses or RPC failure envelopes.
#[derive(Debug, Error)]
pub enum HostError {
    /// Error from this App
    #[error("Host Error: {message} {location}")]
    Host {
        message: String,
        location: ErrorLocation,
    },

    /// Error from bridge-core (config, mounts, packager, server)
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ConfigError> for HostError {
    fn from(error: ConfigError) -> Self {
        HostError::Core(error.into())
    }
}

impl From<PackError> for HostError {
    fn from(error: PackError) -> Self {
        HostError::Core(error.into())
    }
}

impl From<ResourceError> for HostError {
    fn from(error: ResourceError) -> Self {
        HostError::Core(error.into())
    }
}

impl From<ServerError> for HostError {
    fn from(error: ServerError) -> Self {
        HostError::Core(error.into())
    }
}

impl From<RpcError> for HostError {
    fn from(error: RpcError) -> Self {
        HostError::Core(error.into())
    }
}
