//! Route definitions
//!
//! Defines all HTTP API endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, messages, root, sse_connect, sse_post};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Server info
        .route("/", get(root))
        .route("/health", get(health))
        // MCP over plain HTTP
        .route("/messages", post(messages))
        // MCP over SSE
        .route("/sse", get(sse_connect).post(sse_post))
}
