//! Asset-serving failures and their HTTP status mapping.

use crate::error::resource::ResourceError;

use common::ErrorLocation;

use std::panic::Location;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AssetError {
    #[error("Not Found Error: {path} {location}")]
    NotFound {
        path: String,
        location: ErrorLocation,
    },

    #[error("Forbidden Error: {message} {location}")]
    Forbidden {
        message: String,
        location: ErrorLocation,
    },

    #[error("Range Not Satisfiable Error: {range} for {size} bytes {location}")]
    RangeNotSatisfiable {
        range: String,
        size: u64,
        location: ErrorLocation,
    },

    #[error("Method Not Allowed Error: {method} {location}")]
    MethodNotAllowed {
        method: String,
        location: ErrorLocation,
    },

    #[error("Internal Error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl AssetError {
    #[track_caller]
    pub fn not_found(path: impl Into<String>) -> Self {
        AssetError::NotFound {
            path: path.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn forbidden(message: impl Into<String>) -> Self {
        AssetError::Forbidden {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn range_not_satisfiable(range: impl Into<String>, size: u64) -> Self {
        AssetError::RangeNotSatisfiable {
            range: range.into(),
            size,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn method_not_allowed(method: impl Into<String>) -> Self {
        AssetError::MethodNotAllowed {
            method: method.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        AssetError::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ResourceError> for AssetError {
    #[track_caller]
    fn from(error: ResourceError) -> Self {
        match error {
            ResourceError::NotFound { path, location } => AssetError::NotFound { path, location },
            other => AssetError::Internal {
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

impl IntoResponse for AssetError {
    fn into_response(self) -> Response {
        // Bodies stay generic; details (paths, locations) only go to the log.
        let status = self.status_code();
        let body = match &self {
            Self::NotFound { .. } => "Not Found",
            Self::Forbidden { .. } => "Forbidden",
            Self::RangeNotSatisfiable { .. } => "Requested Range Not Satisfiable",
            Self::MethodNotAllowed { .. } => "Method Not Allowed",
            Self::Internal { .. } => "Internal Server Error",
        };

        if let Self::RangeNotSatisfiable { size, .. } = &self {
            let unsatisfied = format!("bytes */{size}");
            return (status, [(header::CONTENT_RANGE, unsatisfied)], body).into_response();
        }

        (status, body).into_response()
    }
}
