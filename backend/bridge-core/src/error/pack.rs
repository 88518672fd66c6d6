use crate::error::resource::ResourceError;

use common::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PackError {
    #[error("Pack IO Error: {path}: {source} {location}")]
    Io {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Pack Walk Error: {message} {location}")]
    Walk {
        message: String,
        location: ErrorLocation,
    },

    #[error("Pack Archive Error: {message} {location}")]
    Archive {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl PackError {
    #[track_caller]
    pub fn io(path: impl Into<PathBuf>, source: IoError) -> Self {
        PackError::Io {
            path: path.into(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }

    #[track_caller]
    pub fn archive(message: impl Into<String>) -> Self {
        PackError::Archive {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<walkdir::Error> for PackError {
    #[track_caller]
    fn from(error: walkdir::Error) -> Self {
        PackError::Walk {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<zip::result::ZipError> for PackError {
    #[track_caller]
    fn from(error: zip::result::ZipError) -> Self {
        PackError::Archive {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
