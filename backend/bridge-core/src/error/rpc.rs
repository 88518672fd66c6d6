//! RPC bridge errors.
//!
//! Two layers live here:
//! - [`RpcError`] covers transport-level rejections (unpaired client, wrong
//!   content type, unknown function, envelope codec failures) and maps onto
//!   HTTP status codes.
//! - [`HandlerFailure`] is what a handler raises. It never becomes an HTTP error;
//!   the dispatcher marshals it into the `{false, [kind, message]}` envelope.

use crate::error::codec::CodecError;

use common::ErrorLocation;

use std::fmt;
use std::io::Error as IoError;
use std::panic::Location;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RpcError {
    #[error("Forbidden Error: {message} {location}")]
    Forbidden {
        message: String,
        location: ErrorLocation,
    },

    #[error("Bad Request Error: {message} {location}")]
    BadRequest {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown Function Error: {name} {location}")]
    UnknownFunction {
        name: String,
        location: ErrorLocation,
    },

    #[error("Envelope Encode Error: {message} {location}")]
    Encode {
        message: String,
        location: ErrorLocation,
    },

    #[error("Envelope Decode Error: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },
}

impl RpcError {
    #[track_caller]
    pub fn forbidden(message: impl Into<String>) -> Self {
        RpcError::Forbidden {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn bad_request(message: impl Into<String>) -> Self {
        RpcError::BadRequest {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_function(name: impl Into<String>) -> Self {
        RpcError::UnknownFunction {
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn encode(message: impl Into<String>) -> Self {
        RpcError::Encode {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        RpcError::Decode {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::UnknownFunction { .. } => StatusCode::NOT_FOUND,
            Self::Encode { .. } | Self::Decode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Forbidden { .. } => "Forbidden",
            Self::BadRequest { .. } => "Bad Request",
            Self::UnknownFunction { .. } => "Not Found",
            Self::Encode { .. } | Self::Decode { .. } => "Internal Server Error",
        };

        (status, body).into_response()
    }
}

/// A failure raised inside an RPC handler.
///
/// `kind` names the failure class the frontend shows (e.g. `NotFound`,
/// `ToolExitError`); `message` is the human-readable detail.
#[derive(Debug, Clone)]
pub struct HandlerFailure {
    pub kind: String,
    pub message: String,
    pub location: ErrorLocation,
}

impl HandlerFailure {
    #[track_caller]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Argument list did not match the handler's parameters.
    #[track_caller]
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new("InvalidArguments", message)
    }
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.kind, self.message, self.location)
    }
}

impl std::error::Error for HandlerFailure {}

impl From<IoError> for HandlerFailure {
    #[track_caller]
    fn from(error: IoError) -> Self {
        HandlerFailure::new(format!("{:?}", error.kind()), error.to_string())
    }
}

impl From<CodecError> for HandlerFailure {
    #[track_caller]
    fn from(error: CodecError) -> Self {
        HandlerFailure::new(error.kind(), error.to_string())
    }
}

impl From<rmp_serde::decode::Error> for HandlerFailure {
    #[track_caller]
    fn from(error: rmp_serde::decode::Error) -> Self {
        HandlerFailure::invalid_arguments(error.to_string())
    }
}
