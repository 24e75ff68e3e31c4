use serde::{Deserialize, Serialize};

use super::response::{FinishReason, Usage};
use crate::error::LlmError;

/// One incremental fragment of a streamed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Incremental text content (possibly empty)
    #[serde(default)]
    pub content: String,
    /// Whether this chunk terminates the turn. Exactly one chunk per healthy
    /// turn carries `done = true`.
    #[serde(default)]
    pub done: bool,
    /// Provider id that emitted the chunk
    pub provider: String,
    /// Partial tool call fragments carried by this chunk
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallDelta>,
    /// Metadata the vendor attached to this chunk
    #[serde(default)]
    pub meta: ChunkMeta,
}

impl StreamChunk {
    /// An empty chunk tagged with the given provider
    pub fn empty(provider: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            done: false,
            provider: provider.into(),
            tool_calls: Vec::new(),
            meta: ChunkMeta::default(),
        }
    }
}

/// Per-chunk delta of one tool call.
///
/// Argument fragments for the same `call_id` may arrive across several
/// chunks; the caller concatenates `arguments_delta` values keyed by
/// `call_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    /// Identifier of the tool call this fragment belongs to
    pub call_id: String,
    /// Tool name (present on the first fragment of a call)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fragment of the JSON-encoded arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments_delta: Option<String>,
}

/// Vendor metadata attached to a stream chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Model producing the stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Vendor response/session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    /// Token counts reported so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Finish reason, present once the vendor reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Normalized error carried by a failure-terminal chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<LlmError>,
}
