//! MCP message routing
//!
//! Turns one inbound JSON-RPC message into at most one response. Transport
//! concerns (HTTP, SSE, stdio) live elsewhere.

use std::sync::Arc;

use plex_core::{ToolManager, ToolRequest};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, RequestId,
};

/// Routes MCP methods to the tool registry
#[derive(Clone)]
pub struct McpHandler {
    tools: Arc<ToolManager>,
}

impl McpHandler {
    pub fn new(tools: Arc<ToolManager>) -> Self {
        Self { tools }
    }

    /// Handle raw message text; malformed JSON yields a parse error with `id: null`
    pub async fn handle_text(&self, text: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<Value>(text) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                debug!("Rejecting malformed message: {}", e);
                Some(JsonRpcResponse::failure(None, JsonRpcError::parse_error(e)))
            }
        }
    }

    /// Handle a parsed message; notifications produce `None`
    pub async fn handle_message(&self, message: Value) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_value(message.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = message
                    .get("id")
                    .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());
                return Some(JsonRpcResponse::failure(id, JsonRpcError::invalid_request(e)));
            }
        };

        info!("Handling MCP message: {}", request.method);

        let result = self.dispatch(&request).await;
        if request.is_notification() {
            return None;
        }

        let id = request.id;
        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    async fn dispatch(&self, request: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => Ok(json!(InitializeResult::default())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!(ListToolsResult {
                tools: self.tools.definitions(),
            })),
            "tools/call" => self.call_tool(request.params.clone()).await,
            method if method.starts_with("notifications/") => Ok(Value::Null),
            method => Err(JsonRpcError::unknown_method(method)),
        }
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| {
                let mut error = JsonRpcError::new(
                    JsonRpcError::INVALID_PARAMS,
                    format!("Invalid tools/call params: {}", e),
                );
                error.data = Some(json!({"kind": "invalid_argument", "argument": "name"}));
                error
            })?;

        let request = ToolRequest::new(params.name, params.arguments.unwrap_or(Value::Null));
        let response = self.tools.dispatch(&request).await;

        match (response.payload, response.error) {
            (_, Some(failure)) => Err(JsonRpcError::from(&failure)),
            (Some(payload), None) => Ok(json!(CallToolResult::json(&payload))),
            (None, None) => Ok(json!(CallToolResult::json(&Value::Null))),
        }
    }
}
