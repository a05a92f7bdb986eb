//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are the read-only query operations the exploration agent may invoke
//! through its action grammar. Every tool answers with a result envelope
//! (`{"status": "success" | "error", ...}`), and dispatch through the
//! [`ToolRegistry`] never fails: lookup misses and execution errors become
//! error envelopes the agent can read and recover from.

use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A tool definition, used to describe the catalog to the reasoning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: Value,
}

impl ToolDefinition {
    /// Human-readable argument list derived from the parameter schema,
    /// e.g. `query (str, optional), limit (int, default=5)`.
    pub fn argument_summary(&self) -> String {
        let Some(properties) = self.parameters.get("properties").and_then(Value::as_object) else {
            return "None".to_string();
        };
        if properties.is_empty() {
            return "None".to_string();
        }

        let required: Vec<&str> = self
            .parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        properties
            .iter()
            .map(|(name, schema)| {
                let kind = schema_type_name(schema);
                let qualifier = if required.contains(&name.as_str()) {
                    "required".to_string()
                } else if let Some(default) = schema.get("default") {
                    format!("default={default}")
                } else {
                    "optional".to_string()
                };
                format!("{name} ({kind}, {qualifier})")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn schema_type_name(schema: &Value) -> String {
    match schema.get("type").and_then(Value::as_str) {
        Some("string") => "str".to_string(),
        Some("integer") => "int".to_string(),
        Some("boolean") => "bool".to_string(),
        Some("array") => {
            let item = schema.get("items").map(schema_type_name);
            format!("list[{}]", item.as_deref().unwrap_or("any"))
        }
        Some(other) => other.to_string(),
        None => "any".to_string(),
    }
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the envelope reports success
    pub success: bool,

    /// The envelope, serialized compactly
    pub output: String,

    /// The envelope as structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ToolResult {
    /// Wrap an envelope value; `success` mirrors its `status` field.
    pub fn from_envelope(envelope: Value) -> Self {
        let success = envelope.get("status").and_then(Value::as_str) == Some("success");
        Self {
            success,
            output: envelope.to_string(),
            data: Some(envelope),
        }
    }

    /// The structured envelope, falling back to the raw output.
    pub fn into_envelope(self) -> Value {
        self.data.unwrap_or(Value::String(self.output))
    }
}

/// Structured tool answer: `{"status": "success", ...payload}` or
/// `{"status": "error", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Envelope<T> {
    Success(T),
    Error { message: String },
}

impl<T> Envelope<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl<T: Serialize> Envelope<T> {
    /// Serialize to JSON, degrading to an error envelope if the payload
    /// cannot be represented.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| error_envelope(format!("{e}")))
    }
}

/// A bare `{"status": "error", "message": ...}` value.
pub fn error_envelope(message: impl Into<String>) -> Value {
    serde_json::json!({ "status": "error", "message": message.into() })
}

/// The core Tool trait.
///
/// Tools are registered in the [`ToolRegistry`] and made available to the
/// agent loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "search_types").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the reasoning service).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: Value) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// An ordered registry of available tools.
///
/// Registration order is the catalog order shown to the reasoning service.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Replaces, in place, any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// All tool definitions, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// Execute a tool by name and always return an envelope.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> Value {
        let Some(tool) = self.get(name) else {
            debug!(tool = name, "Unknown tool requested");
            return error_envelope(format!("Unknown tool: {name}"));
        };
        match tool.execute(arguments).await {
            Ok(result) => result.into_envelope(),
            Err(e) => {
                debug!(tool = name, error = %e, "Tool execution failed");
                error_envelope(format!("Error executing {name}: {e}"))
            }
        }
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
