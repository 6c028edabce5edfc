//! HTTP API handlers

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::stream::Stream;
use plex_mcp::{JsonRpcError, JsonRpcResponse};
use serde::Serialize;
use tracing::debug;

use crate::server::AppState;
use crate::sse::event_stream;

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub server: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub server: String,
}

// ============================================================================
// Handler functions
// ============================================================================

/// Server identification
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Plex MCP Server",
        server: state.server_name.to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        server: state.server_name.to_string(),
    })
}

async fn handle_body(state: &AppState, body: &[u8]) -> Option<JsonRpcResponse> {
    match std::str::from_utf8(body) {
        Ok(text) => {
            debug!("Received message: {}", text);
            state.handler.handle_text(text).await
        }
        Err(e) => Some(JsonRpcResponse::failure(None, JsonRpcError::parse_error(e))),
    }
}

fn into_http(response: Option<JsonRpcResponse>) -> Response {
    match response {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// One JSON-RPC message in, one response out
pub async fn messages(State(state): State<AppState>, body: Bytes) -> Response {
    into_http(handle_body(&state, &body).await)
}

/// Like [`messages`], also pushing the response to every open SSE stream
pub async fn sse_post(State(state): State<AppState>, body: Bytes) -> Response {
    let response = handle_body(&state, &body).await;
    if let Some(response) = &response {
        let delivered = state.connections.broadcast(&response.to_value());
        debug!("Forwarded response to {} SSE connection(s)", delivered);
    }
    into_http(response)
}

/// Open an event stream
pub async fn sse_connect(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(event_stream(state.connections.clone(), state.keepalive))
}
