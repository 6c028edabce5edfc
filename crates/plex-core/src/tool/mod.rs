//! Tool system for MCP `tools/call`
//!
//! This module provides the registry that maps tool names to handlers
//! and the dispatcher that validates and executes requests.

pub mod definition;
pub mod manager;
pub mod traits;

pub use definition::{ParamSpec, ParamType, SchemaBuilder, ToolDefinition};
pub use manager::ToolManager;
pub use traits::{Tool, ToolArgs, ToolFailure, ToolRequest, ToolResponse};
