//! plex-core: Plex MCP Server Core Library
//!
//! Configuration, error types, the tool registry and dispatcher, and the
//! read-only client for the upstream Plex Media Server.

pub mod config;
pub mod error;
pub mod plex;
pub mod tool;

pub use config::{Config, PlexConfig, ServerConfig};
pub use error::{Error, ErrorKind, Result};
pub use plex::{MediaLibrary, PlexClient};
pub use tool::{
    ParamSpec, ParamType, Tool, ToolArgs, ToolDefinition, ToolFailure, ToolManager, ToolRequest,
    ToolResponse,
};
