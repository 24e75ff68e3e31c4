//! `OpenAI` Responses API wire format types

use serde::{Deserialize, Serialize};

// -- Request types --

/// `OpenAI` Responses API request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiRequest {
    /// Model identifier
    pub model: String,
    /// Input items (messages, function calls, function call outputs)
    pub input: Vec<OpenAiInputItem>,
    /// System instructions, hoisted out of the message sequence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Identifier of the prior response this request continues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
    /// Tool definitions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OpenAiTool>>,
    /// Whether to stream the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Item in the `input` array of a Responses API request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiInputItem {
    /// Conversation message
    Message {
        /// Message role ("user" or "assistant")
        role: String,
        /// Message text
        content: String,
    },
    /// Function call issued by the assistant in a prior turn
    FunctionCall {
        /// Call identifier
        call_id: String,
        /// Function name
        name: String,
        /// JSON-encoded arguments
        arguments: String,
    },
    /// Output of a function call, fed back to the model
    FunctionCallOutput {
        /// Call identifier this output responds to
        call_id: String,
        /// Tool output text
        output: String,
    },
}

/// `OpenAI` Responses API tool definition (function fields are flattened,
/// unlike the chat completions shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiTool {
    /// Tool type (always "function")
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

// -- Response types --

/// `OpenAI` Responses API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiResponse {
    /// Response identifier
    pub id: String,
    /// Model used
    #[serde(default)]
    pub model: String,
    /// Terminal status ("completed", "incomplete", "failed")
    #[serde(default)]
    pub status: Option<String>,
    /// Output items
    #[serde(default)]
    pub output: Vec<OpenAiOutputItem>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
    /// Why an "incomplete" response stopped
    #[serde(default)]
    pub incomplete_details: Option<OpenAiIncompleteDetails>,
    /// Failure detail for a "failed" response
    #[serde(default)]
    pub error: Option<OpenAiErrorDetail>,
}

/// Item in the `output` array of a response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiOutputItem {
    /// Assistant message
    Message {
        /// Content blocks
        #[serde(default)]
        content: Vec<OpenAiOutputContent>,
    },
    /// Function call requested by the model
    FunctionCall {
        /// Item identifier (distinct from the call id)
        #[serde(default)]
        id: Option<String>,
        /// Call identifier (generated downstream when the vendor omits it)
        #[serde(default)]
        call_id: Option<String>,
        /// Function name
        name: String,
        /// JSON-encoded arguments
        #[serde(default)]
        arguments: String,
    },
    /// Item types this layer does not consume (reasoning, web search, ...)
    #[serde(other)]
    Other,
}

/// Content block within a message output item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiOutputContent {
    /// Generated text
    OutputText {
        /// The text string
        text: String,
    },
    /// Refusals and other block types
    #[serde(other)]
    Other,
}

/// Token usage in a Responses API response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiUsage {
    /// Prompt tokens
    #[serde(default)]
    pub input_tokens: u32,
    /// Completion tokens
    #[serde(default)]
    pub output_tokens: u32,
    /// Total tokens
    #[serde(default)]
    pub total_tokens: u32,
}

/// Detail for an "incomplete" response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiIncompleteDetails {
    /// Reason the response is incomplete (e.g. "max_output_tokens")
    #[serde(default)]
    pub reason: Option<String>,
}

/// Error detail embedded in a failed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiErrorDetail {
    /// Error message
    #[serde(default)]
    pub message: String,
    /// Error code
    #[serde(default)]
    pub code: Option<String>,
}

// -- Streaming types --

/// `OpenAI` Responses API SSE event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OpenAiStreamEvent {
    /// Incremental output text
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta {
        /// Text fragment
        delta: String,
    },
    /// A new output item appeared (used here for function calls)
    #[serde(rename = "response.output_item.added")]
    OutputItemAdded {
        /// The new item
        item: OpenAiOutputItem,
    },
    /// Incremental function call arguments
    #[serde(rename = "response.function_call_arguments.delta")]
    FunctionCallArgumentsDelta {
        /// Output item the fragment belongs to
        item_id: String,
        /// Arguments fragment
        delta: String,
    },
    /// Stream opened; carries the response identifier
    #[serde(rename = "response.created")]
    Created {
        /// Partial response with metadata
        response: OpenAiResponse,
    },
    /// Generation finished; carries final usage
    #[serde(rename = "response.completed")]
    Completed {
        /// Final response snapshot
        response: OpenAiResponse,
    },
    /// Generation failed mid-stream
    #[serde(rename = "response.failed")]
    Failed {
        /// Failed response snapshot
        response: OpenAiResponse,
    },
    /// Event types carrying no information this layer consumes
    #[serde(other)]
    Other,
}
