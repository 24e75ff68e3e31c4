use serde::{Deserialize, Serialize};

/// Definition of a tool the model can call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name, unique within one request
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Vendor-assigned call identifier, or a generated one when the vendor
    /// omits it
    pub id: String,
    /// Name of the tool to invoke
    pub name: String,
    /// Structured arguments (always a JSON object, never raw text)
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Build a tool call, parsing a vendor's JSON-encoded argument string.
    ///
    /// Unparseable argument text degrades to an empty object rather than
    /// failing the whole response.
    pub fn from_raw_arguments(id: impl Into<String>, name: impl Into<String>, arguments: &str) -> Self {
        let arguments = serde_json::from_str(arguments).unwrap_or_else(|_| serde_json::json!({}));
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Result of executing one tool call, supplied by the tool executor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result responds to
    pub tool_call_id: String,
    /// Output content from the tool
    pub output: String,
}
