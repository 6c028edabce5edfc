//! HTTP API Server
//!
//! Starts and manages the axum-based HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use plex_mcp::McpHandler;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::routes::routes;
use crate::sse::SseConnections;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// MCP message router
    pub handler: McpHandler,
    /// Friendly name of the upstream Plex server
    pub server_name: Arc<str>,
    /// Open SSE streams
    pub connections: Arc<SseConnections>,
    /// Idle time before an SSE keepalive event
    pub keepalive: Duration,
}

impl AppState {
    pub fn new(handler: McpHandler, server_name: impl Into<Arc<str>>, keepalive: Duration) -> Self {
        Self {
            handler,
            server_name: server_name.into(),
            connections: Arc::new(SseConnections::new()),
            keepalive,
        }
    }
}

/// Build the router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind a listener; `host` may be an IP address or a name such as `localhost`
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .map_err(|source| ApiError::Bind {
            addr: format!("{}:{}", host, port),
            source,
        })
}

/// Start the HTTP API server
pub async fn start_server(host: &str, port: u16, state: AppState) -> Result<()> {
    let listener = bind(host, port).await?;
    let addr = listener.local_addr()?;
    info!("Starting Plex MCP Server on {}", addr);
    info!("SSE endpoint: http://{}/sse", addr);

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
