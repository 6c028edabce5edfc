//! Tool manager for registering and dispatching tools

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::tool::definition::validate_arguments;
use crate::tool::{Tool, ToolDefinition, ToolRequest, ToolResponse};
use crate::{Error, Result};

/// Registry of available tools
///
/// Handles tool registration, lookup, argument validation and execution.
pub struct ToolManager {
    /// Registered tools indexed by name
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolManager {
    /// Create a new empty tool manager
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    ///
    /// If a tool with the same name already exists, it will be replaced.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        if let Some(previous) = self.tools.insert(tool.name().to_string(), tool) {
            warn!("Replaced previously registered tool: {}", previous.name());
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Get all registered tool definitions, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|t| ToolDefinition::new(t.name(), t.description(), &t.parameters()))
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Execute a tool by name
    ///
    /// # Errors
    /// Returns an error if the tool is not found, an argument fails
    /// validation, or the tool itself fails
    pub async fn execute(&self, name: &str, arguments: &JsonValue) -> Result<JsonValue> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        let args = validate_arguments(&tool.parameters(), arguments)?;
        tool.execute(args).await
    }

    /// Dispatch a request and wrap the outcome
    ///
    /// Never fails: every error is folded into the returned response.
    pub async fn dispatch(&self, request: &ToolRequest) -> ToolResponse {
        info!("Calling tool: {} with args: {}", request.name, request.arguments);

        let result = self.execute(&request.name, &request.arguments).await;
        if let Err(e) = &result {
            warn!("Tool {} failed ({}): {}", request.name, e.kind(), e);
        }
        result.into()
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all registered tool names, sorted
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}
