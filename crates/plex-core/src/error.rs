//! Error types for plex-core

use serde::Serialize;
use thiserror::Error;

/// Main error type for plex-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("{message}")]
    NotFound { argument: String, message: String },

    #[error("Plex server unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Plex server returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Invalid response from Plex server: {0}")]
    UpstreamResponse(String),

    #[error("No {0} section found in Plex library")]
    SectionNotFound(&'static str),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for plex-core
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-facing error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownTool,
    InvalidArgument,
    UpstreamUnreachable,
    UpstreamError,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown_tool",
            Self::InvalidArgument => "invalid_argument",
            Self::UpstreamUnreachable => "upstream_unreachable",
            Self::UpstreamError => "upstream_error",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Build an `InvalidArgument` error
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Build a `NotFound` error tied to the argument that failed to match
    pub fn not_found(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Category reported to the caller
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTool(_) => ErrorKind::UnknownTool,
            Self::MissingArgument(_) | Self::InvalidArgument { .. } | Self::NotFound { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::UpstreamUnreachable(_) => ErrorKind::UpstreamUnreachable,
            Self::UpstreamStatus { .. } | Self::UpstreamResponse(_) | Self::SectionNotFound(_) => {
                ErrorKind::UpstreamError
            }
            Self::Json(_) | Self::Config(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }

    /// Name of the offending argument, if any
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::MissingArgument(name) => Some(name),
            Self::InvalidArgument { name, .. } => Some(name),
            Self::NotFound { argument, .. } => Some(argument),
            _ => None,
        }
    }

    /// Upstream HTTP status, if the failure came from a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            Self::UpstreamStatus {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else if e.is_decode() {
            Self::UpstreamResponse(e.to_string())
        } else {
            // connect, timeout, request building and body transfer failures
            Self::UpstreamUnreachable(e.to_string())
        }
    }
}
