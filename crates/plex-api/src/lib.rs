//! plex-api: HTTP and SSE transport for the Plex MCP server
//!
//! Exposes the MCP handler over axum: a JSON-RPC `POST` endpoint, an SSE
//! stream, and informational `GET` routes.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod sse;

pub use error::{ApiError, Result};
pub use server::{bind, build_router, start_server, AppState};
pub use sse::SseConnections;
