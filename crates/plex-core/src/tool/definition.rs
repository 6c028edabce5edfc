//! Tool definitions and parameter schemas
//!
//! A tool declares its parameters as a list of [`ParamSpec`]. The same list
//! renders the MCP `inputSchema` and drives argument validation, so the
//! advertised schema and the enforced one cannot drift apart.

use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};
use tracing::debug;

use crate::tool::ToolArgs;
use crate::{Error, Result};

/// JSON type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Whether `value` has this JSON type
    pub fn matches(&self, value: &JsonValue) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// Declared parameter of a tool
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
    pub default: Option<JsonValue>,
}

impl ParamSpec {
    /// A parameter the caller must supply
    pub fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required: true,
            default: None,
        }
    }

    /// A parameter the caller may omit
    pub fn optional(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }

    /// Value used when the caller omits the parameter
    pub fn with_default(mut self, default: impl Into<JsonValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    fn schema(&self) -> JsonValue {
        let mut schema = json!({
            "type": self.param_type.as_str(),
            "description": self.description,
        });
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        schema
    }
}

/// Tool definition as advertised by `tools/list`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: JsonValue,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str, params: &[ParamSpec]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: SchemaBuilder::object_schema(params),
        }
    }
}

/// Helper functions for creating tool schemas
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Create an object schema from parameter specs
    ///
    /// `required` is only emitted when at least one parameter is required.
    pub fn object_schema(params: &[ParamSpec]) -> JsonValue {
        let props: Map<String, JsonValue> = params
            .iter()
            .map(|p| (p.name.clone(), p.schema()))
            .collect();

        let required: Vec<&str> = params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": props,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}

/// Check `arguments` against `params` and fill in defaults
///
/// Only presence and JSON type are checked. A `null` argument counts as
/// absent, and undeclared arguments are dropped.
pub fn validate_arguments(params: &[ParamSpec], arguments: &JsonValue) -> Result<ToolArgs> {
    let empty = Map::new();
    let provided = match arguments {
        JsonValue::Null => &empty,
        JsonValue::Object(map) => map,
        _ => {
            return Err(Error::invalid_argument(
                "arguments",
                "expected a JSON object",
            ));
        }
    };

    for name in provided.keys() {
        if !params.iter().any(|p| &p.name == name) {
            debug!("Ignoring undeclared argument: {}", name);
        }
    }

    let mut values = Map::new();
    for param in params {
        match provided.get(&param.name).filter(|v| !v.is_null()) {
            Some(value) => {
                if !param.param_type.matches(value) {
                    return Err(Error::invalid_argument(
                        &param.name,
                        format!("expected {}, got {}", param.param_type.as_str(), type_name(value)),
                    ));
                }
                values.insert(param.name.clone(), value.clone());
            }
            None if param.required => {
                return Err(Error::MissingArgument(param.name.clone()));
            }
            None => {
                if let Some(default) = &param.default {
                    values.insert(param.name.clone(), default.clone());
                }
            }
        }
    }

    Ok(ToolArgs::new(values))
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_f64() => "number",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_params() -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("query", ParamType::String, "Movie title to search for"),
            ParamSpec::optional("limit", ParamType::Integer, "Maximum results").with_default(10),
        ]
    }

    #[test]
    fn test_object_schema() {
        let schema = SchemaBuilder::object_schema(&search_params());
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["properties"]["limit"]["type"], "integer");
        assert_eq!(schema["properties"]["limit"]["default"], 10);
        assert_eq!(schema["required"], json!(["query"]));
    }

    #[test]
    fn test_object_schema_without_required() {
        let schema = SchemaBuilder::object_schema(&[]);
        assert_eq!(schema, json!({"type": "object", "properties": {}}));
    }

    #[test]
    fn test_definition_serializes_camel_case() {
        let def = ToolDefinition::new("search_movies", "Search for movies by title", &search_params());
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["name"], "search_movies");
        assert!(json.get("inputSchema").is_some());
        assert!(json.get("input_schema").is_none());
    }

    #[test]
    fn test_validate_applies_defaults() {
        let args = validate_arguments(&search_params(), &json!({"query": "Alien"})).unwrap();
        assert_eq!(args.string("query").unwrap(), "Alien");
        assert_eq!(args.integer("limit").unwrap(), 10);
    }

    #[test]
    fn test_validate_missing_required() {
        let err = validate_arguments(&search_params(), &json!({"limit": 5})).unwrap_err();
        assert!(matches!(err, Error::MissingArgument(ref name) if name == "query"));
        assert!(err.to_string().contains("query"));
    }

    #[test]
    fn test_validate_null_counts_as_missing() {
        let err = validate_arguments(&search_params(), &json!({"query": null})).unwrap_err();
        assert_eq!(err.argument(), Some("query"));

        let err = validate_arguments(&search_params(), &JsonValue::Null).unwrap_err();
        assert_eq!(err.argument(), Some("query"));
    }

    #[test]
    fn test_validate_wrong_type() {
        let err = validate_arguments(&search_params(), &json!({"query": "x", "limit": "ten"}))
            .unwrap_err();
        assert_eq!(err.argument(), Some("limit"));
        assert!(err.to_string().contains("expected integer, got string"));

        let err = validate_arguments(&search_params(), &json!({"query": "x", "limit": 2.5}))
            .unwrap_err();
        assert!(err.to_string().contains("got number"));
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let err = validate_arguments(&search_params(), &json!(["Alien"])).unwrap_err();
        assert_eq!(err.argument(), Some("arguments"));
    }

    #[test]
    fn test_validate_drops_undeclared() {
        let args = validate_arguments(&search_params(), &json!({"query": "x", "extra": true}))
            .unwrap();
        assert!(args.get("extra").is_none());
    }

    #[test]
    fn test_number_accepts_integers() {
        assert!(ParamType::Number.matches(&json!(7)));
        assert!(ParamType::Number.matches(&json!(7.5)));
        assert!(!ParamType::Integer.matches(&json!(7.5)));
        assert!(ParamType::Boolean.matches(&json!(false)));
    }
}
