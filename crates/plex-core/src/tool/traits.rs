//! Tool trait definition
//!
//! Defines the core trait for tools exposed over MCP, along with the
//! request/response types that flow through the dispatcher.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::ErrorKind;
use crate::tool::definition::ParamSpec;
use crate::{Error, Result};

/// Inbound tool invocation
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub name: String,
    pub arguments: JsonValue,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>, arguments: JsonValue) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Structured failure carried by a [`ToolResponse`]
#[derive(Debug, Clone, Serialize)]
pub struct ToolFailure {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Outcome of a single dispatch
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolFailure>,
}

impl ToolResponse {
    /// Create a successful response
    pub fn success(payload: JsonValue) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    /// Create a failed response from an error
    pub fn failure(error: &Error) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(ToolFailure {
                kind: error.kind(),
                message: error.to_string(),
                argument: error.argument().map(str::to_string),
                status: error.status(),
            }),
        }
    }
}

impl From<Result<JsonValue>> for ToolResponse {
    fn from(result: Result<JsonValue>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(e) => Self::failure(&e),
        }
    }
}

/// Validated arguments handed to [`Tool::execute`]
///
/// Defaults have already been applied, so accessors for parameters that
/// declare a default always succeed.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    values: Map<String, JsonValue>,
}

impl ToolArgs {
    pub fn new(values: Map<String, JsonValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.values.get(name)
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.opt_string(name)
            .ok_or_else(|| Error::MissingArgument(name.to_string()))
    }

    pub fn opt_string(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(JsonValue::as_str)
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        self.opt_integer(name)
            .ok_or_else(|| Error::MissingArgument(name.to_string()))
    }

    pub fn opt_integer(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(JsonValue::as_i64)
    }

    pub fn opt_number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(JsonValue::as_f64)
    }

    /// Non-negative integer such as a limit or offset
    pub fn count(&self, name: &str) -> Result<usize> {
        let value = self.integer(name)?;
        usize::try_from(value)
            .map_err(|_| Error::invalid_argument(name, format!("must be non-negative, got {}", value)))
    }
}

/// Tool trait for MCP tools
///
/// Implement this trait to expose an operation through `tools/call`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name (unique within a registry)
    fn name(&self) -> &str;

    /// Get the tool description (shown to the client when selecting tools)
    fn description(&self) -> &str;

    /// Declared parameters, used for both the schema and validation
    fn parameters(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    /// Execute the tool with validated arguments
    async fn execute(&self, args: ToolArgs) -> Result<JsonValue>;
}
