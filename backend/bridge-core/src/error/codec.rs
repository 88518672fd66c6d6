use common::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;

use thiserror::Error as ThisError;

/// Failures of the external encoder and metric tools.
#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("Tool Unavailable Error: {tool} {location}")]
    Unavailable {
        tool: String,
        location: ErrorLocation,
    },

    #[error("Tool Spawn Error: {tool}: {source} {location}")]
    Spawn {
        tool: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Tool Exit Error: {tool} exited with {status}: {stderr} {location}")]
    ExitStatus {
        tool: String,
        status: String,
        stderr: String,
        location: ErrorLocation,
    },

    #[error("Tool Output Error: {tool}: {message} {location}")]
    Parse {
        tool: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Option Error: {encoder}: {message} {location}")]
    InvalidOption {
        encoder: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Image Error: {message} {location}")]
    Image {
        message: String,
        location: ErrorLocation,
    },

    #[error("Codec IO Error: {message}: {source} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },
}

impl CodecError {
    #[track_caller]
    pub fn unavailable(tool: impl Into<String>) -> Self {
        CodecError::Unavailable {
            tool: tool.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn spawn(tool: impl Into<String>, source: IoError) -> Self {
        CodecError::Spawn {
            tool: tool.into(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }

    #[track_caller]
    pub fn exit_status(
        tool: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        CodecError::ExitStatus {
            tool: tool.into(),
            status: status.into(),
            stderr: stderr.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn parse(tool: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::Parse {
            tool: tool.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_option(encoder: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::InvalidOption {
            encoder: encoder.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn image(message: impl Into<String>) -> Self {
        CodecError::Image {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn io(message: impl Into<String>, source: IoError) -> Self {
        CodecError::Io {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }

    /// Failure class reported to the frontend in the RPC failure envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            CodecError::Unavailable { .. } => "ToolUnavailable",
            CodecError::Spawn { .. } => "ToolSpawnError",
            CodecError::ExitStatus { .. } => "ToolExitError",
            CodecError::Parse { .. } => "ToolOutputError",
            CodecError::InvalidOption { .. } => "InvalidOption",
            CodecError::Image { .. } => "ImageError",
            CodecError::Io { .. } => "IoError",
        }
    }
}
