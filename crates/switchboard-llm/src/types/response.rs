use serde::{Deserialize, Serialize};

use super::message::Message;
use super::tool::ToolCall;
use crate::error::LlmError;

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of generation
    Stop,
    /// Model decided to call one or more tools
    ToolCalls,
    /// Hit the output token limit
    Length,
    /// The turn failed
    Error,
    /// The vendor reported something we do not recognize
    Unknown,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion)
    pub total_tokens: u32,
}

/// Internal canonical response to one turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Whether the turn succeeded
    pub success: bool,
    /// Concatenated text content, in vendor order (may be empty when the
    /// turn produced only tool calls)
    pub content: String,
    /// Tool calls requested by the model, in vendor order
    pub tool_calls: Vec<ToolCall>,
    /// Token usage statistics
    pub usage: Usage,
    /// Model that actually produced the response
    pub model: String,
    /// Vendor response identifier, when the vendor assigns one. Needed to
    /// build a server-side-state continuation context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    /// Why generation stopped
    pub finish_reason: FinishReason,
    /// Failure detail, present iff `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<LlmError>,
    /// Provider id that served the turn
    pub provider: String,
    /// Raw vendor payload, retained for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl ChatResponse {
    /// Build a failed response carrying the given error
    pub fn failure(provider: impl Into<String>, error: LlmError, raw: Option<serde_json::Value>) -> Self {
        Self {
            success: false,
            content: String::new(),
            tool_calls: Vec::new(),
            usage: Usage::default(),
            model: String::new(),
            response_id: None,
            finish_reason: FinishReason::Error,
            error: Some(error),
            provider: provider.into(),
            raw,
        }
    }
}

/// Conversation context carried from one turn into a tool continuation.
///
/// Constructed by the caller from the prior turn's request and response; the
/// normalization layer never stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinuationContext {
    /// Model id for the continuation turn
    pub model: String,
    /// Provider-specific conversation state
    pub state: ContinuationState,
}

/// Provider-specific conversation state inside a [`ContinuationContext`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContinuationState {
    /// Prior response identifier, for vendors tracking conversation state
    /// server-side
    ResponseId(String),
    /// Full prior message sequence, for vendors requiring client-replayed
    /// history
    History(Vec<Message>),
}

impl ContinuationContext {
    /// Context for a server-side-state provider
    pub fn response_id(model: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            state: ContinuationState::ResponseId(id.into()),
        }
    }

    /// Context for a history-replay provider
    pub fn history(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            state: ContinuationState::History(messages),
        }
    }
}
