//! Conversion between internal types and the Anthropic Messages wire format

use crate::protocol::anthropic::{
    AnthropicContent, AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse,
    AnthropicResponseBlock, AnthropicStreamContentBlock, AnthropicStreamDelta, AnthropicStreamEvent, AnthropicTool,
    AnthropicUsage,
};
use crate::sse::SseEvent;
use crate::types::{
    ChatRequest, ChatResponse, ChunkMeta, FinishReason, Role, StreamChunk, ToolCall, ToolCallDelta, Usage,
};

/// Default max tokens when not specified (Anthropic requires this field)
const DEFAULT_MAX_TOKENS: u32 = 4096;

// -- Outbound: internal request -> Anthropic wire format --

impl From<&ChatRequest> for AnthropicRequest {
    fn from(req: &ChatRequest) -> Self {
        let mut system: Vec<&str> = Vec::new();
        let mut messages = Vec::new();

        for msg in &req.messages {
            if msg.role == Role::System {
                system.push(&msg.content);
            } else {
                messages.push(internal_message_to_anthropic(msg));
            }
        }

        let tools = req.tools.as_ref().map(|tools| {
            tools
                .iter()
                .map(|t| AnthropicTool {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    input_schema: t
                        .parameters
                        .clone()
                        .unwrap_or_else(|| serde_json::json!({"type": "object"})),
                })
                .collect()
        });

        Self {
            model: req.model.clone(),
            max_tokens: req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: if system.is_empty() { None } else { Some(system.join("\n\n")) },
            messages,
            temperature: req.temperature,
            stream: if req.stream { Some(true) } else { None },
            tools,
        }
    }
}

/// Convert an internal message to Anthropic wire format
fn internal_message_to_anthropic(msg: &crate::types::Message) -> AnthropicMessage {
    // Tool results ride on a user message as tool_result blocks
    if msg.role == Role::Tool
        && let Some(tool_call_id) = &msg.tool_call_id
    {
        return AnthropicMessage {
            role: "user".to_owned(),
            content: AnthropicContent::Blocks(vec![AnthropicContentBlock::ToolResult {
                tool_use_id: tool_call_id.clone(),
                content: Some(msg.content.clone()),
            }]),
        };
    }

    let role = if msg.role == Role::Assistant { "assistant" } else { "user" };

    // Assistant turns that called tools replay as text + tool_use blocks
    if let Some(tool_calls) = &msg.tool_calls {
        let mut blocks = Vec::new();
        if !msg.content.is_empty() {
            blocks.push(AnthropicContentBlock::Text {
                text: msg.content.clone(),
            });
        }
        for tc in tool_calls {
            blocks.push(AnthropicContentBlock::ToolUse {
                id: tc.id.clone(),
                name: tc.name.clone(),
                input: tc.arguments.clone(),
            });
        }
        return AnthropicMessage {
            role: role.to_owned(),
            content: AnthropicContent::Blocks(blocks),
        };
    }

    AnthropicMessage {
        role: role.to_owned(),
        content: AnthropicContent::Text(msg.content.clone()),
    }
}

// -- Inbound: Anthropic wire response -> internal types --

impl From<AnthropicResponse> for ChatResponse {
    fn from(resp: AnthropicResponse) -> Self {
        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for block in &resp.content {
            match block {
                AnthropicResponseBlock::Text { text } => content.push_str(text),
                AnthropicResponseBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall {
                        id: id.clone(),
                        name: name.clone(),
                        arguments: input.clone(),
                    });
                }
                AnthropicResponseBlock::Other => {}
            }
        }

        Self {
            success: true,
            content,
            tool_calls,
            usage: resp.usage.as_ref().map(usage_from_wire).unwrap_or_default(),
            model: resp.model,
            response_id: Some(resp.id),
            finish_reason: map_stop_reason(resp.stop_reason.as_deref()),
            error: None,
            provider: String::new(),
            raw: None,
        }
    }
}

/// Collect every `tool_use` block in a raw Messages payload
pub fn tool_calls_from_raw(raw: &serde_json::Value) -> Vec<ToolCall> {
    let Ok(resp) = serde_json::from_value::<AnthropicResponse>(raw.clone()) else {
        return Vec::new();
    };
    ChatResponse::from(resp).tool_calls
}

/// Map an Anthropic stop reason to a finish reason
fn map_stop_reason(stop_reason: Option<&str>) -> FinishReason {
    match stop_reason {
        Some("end_turn" | "stop_sequence") => FinishReason::Stop,
        Some("max_tokens") => FinishReason::Length,
        Some("tool_use") => FinishReason::ToolCalls,
        _ => FinishReason::Unknown,
    }
}

fn usage_from_wire(usage: &AnthropicUsage) -> Usage {
    Usage {
        prompt_tokens: usage.input_tokens,
        completion_tokens: usage.output_tokens,
        total_tokens: usage.input_tokens + usage.output_tokens,
    }
}

// -- Stream conversion --

/// Stateful parser for Anthropic SSE events.
///
/// `input_json_delta` events carry no call id; the parser remembers the id
/// of the `tool_use` block opened by the latest `content_block_start`.
/// Completion is signalled by the typed `message_stop` event.
pub struct AnthropicStreamParser {
    provider: String,
    current_call_id: Option<String>,
}

impl AnthropicStreamParser {
    /// Create a parser tagging chunks with the given provider id
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            current_call_id: None,
        }
    }

    fn chunk(&self) -> StreamChunk {
        StreamChunk::empty(&self.provider)
    }

    /// Convert one decoded SSE event to a stream chunk, or `None` when the
    /// event carries nothing this layer consumes
    pub fn parse(&mut self, event: &SseEvent) -> Option<StreamChunk> {
        // Anthropic streams end with a typed event, not a sentinel
        let SseEvent::Data(data) = event else {
            return None;
        };

        let stream_event = match serde_json::from_str::<AnthropicStreamEvent>(data) {
            Ok(ev) => ev,
            Err(e) => {
                tracing::debug!(error = %e, "dropping unparseable Anthropic stream event");
                return None;
            }
        };

        match stream_event {
            AnthropicStreamEvent::Ping => None,

            AnthropicStreamEvent::MessageStart { message } => {
                let mut chunk = self.chunk();
                chunk.meta = ChunkMeta {
                    model: Some(message.model),
                    response_id: Some(message.id),
                    usage: message.usage.as_ref().map(usage_from_wire),
                    finish_reason: None,
                    error: None,
                };
                Some(chunk)
            }

            AnthropicStreamEvent::ContentBlockStart { content_block, .. } => match content_block {
                AnthropicStreamContentBlock::Text { .. } | AnthropicStreamContentBlock::Other => None,
                AnthropicStreamContentBlock::ToolUse { id, name } => {
                    self.current_call_id = Some(id.clone());
                    let mut chunk = self.chunk();
                    chunk.tool_calls.push(ToolCallDelta {
                        call_id: id,
                        name: Some(name),
                        arguments_delta: None,
                    });
                    Some(chunk)
                }
            },

            AnthropicStreamEvent::ContentBlockDelta { delta, .. } => match delta {
                AnthropicStreamDelta::TextDelta { text } => {
                    let mut chunk = self.chunk();
                    chunk.content = text;
                    Some(chunk)
                }
                AnthropicStreamDelta::InputJsonDelta { partial_json } => {
                    let Some(call_id) = self.current_call_id.clone() else {
                        tracing::debug!("input_json_delta outside a tool_use block, dropping");
                        return None;
                    };
                    let mut chunk = self.chunk();
                    chunk.tool_calls.push(ToolCallDelta {
                        call_id,
                        name: None,
                        arguments_delta: Some(partial_json),
                    });
                    Some(chunk)
                }
                AnthropicStreamDelta::Other => None,
            },

            AnthropicStreamEvent::ContentBlockStop { .. } => {
                self.current_call_id = None;
                None
            }

            AnthropicStreamEvent::MessageDelta { delta, usage } => {
                let mut chunk = self.chunk();
                chunk.meta = ChunkMeta {
                    model: None,
                    response_id: None,
                    usage: usage.as_ref().map(usage_from_wire),
                    finish_reason: delta.stop_reason.as_deref().map(|r| map_stop_reason(Some(r))),
                    error: None,
                };
                Some(chunk)
            }

            AnthropicStreamEvent::MessageStop => {
                let mut chunk = self.chunk();
                chunk.done = true;
                Some(chunk)
            }

            AnthropicStreamEvent::Other => None,
        }
    }
}
