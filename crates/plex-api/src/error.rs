//! Error types for plex-api

use thiserror::Error;

/// plex-api error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] plex_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;
