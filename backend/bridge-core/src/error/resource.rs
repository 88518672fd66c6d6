use common::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ResourceError {
    #[error("Not Found Error: {path} {location}")]
    NotFound {
        path: String,
        location: ErrorLocation,
    },

    #[error("Resource IO Error: {path}: {source} {location}")]
    Io {
        path: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Archive Error: {path}: {message} {location}")]
    Archive {
        path: String,
        message: String,
        location: ErrorLocation,
    },

    /// Raised while mounting; the provider is unusable and startup must stop.
    #[error("Provider Init Error: {path}: {message} {location}")]
    ProviderInit {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Salt Error: {length} bytes (maximum {max}) {location}")]
    InvalidSalt {
        length: usize,
        max: usize,
        location: ErrorLocation,
    },
}

impl ResourceError {
    #[track_caller]
    pub fn not_found(path: impl Into<String>) -> Self {
        ResourceError::NotFound {
            path: path.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn io(path: impl Into<String>, source: IoError) -> Self {
        ResourceError::Io {
            path: path.into(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }

    #[track_caller]
    pub fn archive(path: impl Into<String>, message: impl Into<String>) -> Self {
        ResourceError::Archive {
            path: path.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn provider_init(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ResourceError::ProviderInit {
            path: path.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound { .. })
    }
}
