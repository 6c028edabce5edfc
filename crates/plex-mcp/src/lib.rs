//! plex-mcp: MCP (Model Context Protocol) server side
//!
//! JSON-RPC message types, method routing onto the tool registry, and the
//! stdio transport.

pub mod handler;
pub mod protocol;
pub mod stdio;

pub use handler::McpHandler;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use stdio::{run_stdio, serve_lines};
