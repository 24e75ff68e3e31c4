//! Conversion between internal types and the `OpenAI` Responses wire format

use std::collections::HashMap;

use crate::protocol::openai::{
    OpenAiInputItem, OpenAiOutputContent, OpenAiOutputItem, OpenAiRequest, OpenAiResponse, OpenAiStreamEvent,
    OpenAiTool, OpenAiUsage,
};
use crate::sse::SseEvent;
use crate::types::{
    ChatRequest, ChatResponse, ChunkMeta, FinishReason, Role, StreamChunk, ToolCall, ToolCallDelta, Usage,
};

// -- Outbound: internal request -> OpenAI wire format --

impl From<&ChatRequest> for OpenAiRequest {
    fn from(req: &ChatRequest) -> Self {
        let mut instructions: Vec<&str> = Vec::new();
        let mut input = Vec::new();

        for msg in &req.messages {
            match msg.role {
                Role::System => instructions.push(&msg.content),
                Role::Tool => {
                    if let Some(call_id) = &msg.tool_call_id {
                        input.push(OpenAiInputItem::FunctionCallOutput {
                            call_id: call_id.clone(),
                            output: msg.content.clone(),
                        });
                    }
                }
                Role::User | Role::Assistant => {
                    let role = if msg.role == Role::Assistant { "assistant" } else { "user" };
                    if !msg.content.is_empty() || msg.tool_calls.is_none() {
                        input.push(OpenAiInputItem::Message {
                            role: role.to_owned(),
                            content: msg.content.clone(),
                        });
                    }
                    if let Some(tool_calls) = &msg.tool_calls {
                        for tc in tool_calls {
                            input.push(OpenAiInputItem::FunctionCall {
                                call_id: tc.id.clone(),
                                name: tc.name.clone(),
                                arguments: tc.arguments.to_string(),
                            });
                        }
                    }
                }
            }
        }

        let tools = req.tools.as_ref().map(|tools| {
            tools
                .iter()
                .map(|t| OpenAiTool {
                    tool_type: "function".to_owned(),
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                })
                .collect()
        });

        Self {
            model: req.model.clone(),
            input,
            instructions: if instructions.is_empty() {
                None
            } else {
                Some(instructions.join("\n\n"))
            },
            temperature: req.temperature,
            max_output_tokens: req.max_tokens,
            previous_response_id: None,
            tools,
            stream: if req.stream { Some(true) } else { None },
        }
    }
}

// -- Inbound: OpenAI wire response -> internal types --

impl From<OpenAiResponse> for ChatResponse {
    fn from(resp: OpenAiResponse) -> Self {
        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for item in &resp.output {
            match item {
                OpenAiOutputItem::Message { content: blocks } => {
                    for block in blocks {
                        if let OpenAiOutputContent::OutputText { text } = block {
                            content.push_str(text);
                        }
                    }
                }
                OpenAiOutputItem::FunctionCall {
                    call_id, name, arguments, ..
                } => {
                    let call_id = call_id
                        .clone()
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                    tool_calls.push(ToolCall::from_raw_arguments(call_id, name.clone(), arguments));
                }
                OpenAiOutputItem::Other => {}
            }
        }

        let finish_reason = if tool_calls.is_empty() {
            map_status(resp.status.as_deref(), resp.incomplete_details.as_ref().and_then(|d| d.reason.as_deref()))
        } else {
            FinishReason::ToolCalls
        };

        let failed = resp.status.as_deref() == Some("failed") || resp.error.is_some();
        let error = failed.then(|| {
            let message = resp
                .error
                .as_ref()
                .map_or_else(|| "provider reported a failed response".to_owned(), |e| e.message.clone());
            crate::error::LlmError::Unknown(message)
        });

        Self {
            success: !failed,
            content,
            tool_calls,
            usage: resp.usage.as_ref().map(usage_from_wire).unwrap_or_default(),
            model: resp.model,
            response_id: Some(resp.id),
            finish_reason: if failed { FinishReason::Error } else { finish_reason },
            error,
            provider: String::new(),
            raw: None,
        }
    }
}

/// Collect every function-call item in a raw Responses payload
pub fn tool_calls_from_raw(raw: &serde_json::Value) -> Vec<ToolCall> {
    let Ok(resp) = serde_json::from_value::<OpenAiResponse>(raw.clone()) else {
        return Vec::new();
    };
    ChatResponse::from(resp).tool_calls
}

/// Map a Responses API terminal status to a finish reason
fn map_status(status: Option<&str>, incomplete_reason: Option<&str>) -> FinishReason {
    match status {
        Some("completed") => FinishReason::Stop,
        Some("incomplete") => {
            if incomplete_reason == Some("max_output_tokens") {
                FinishReason::Length
            } else {
                FinishReason::Unknown
            }
        }
        Some("failed") => FinishReason::Error,
        _ => FinishReason::Unknown,
    }
}

fn usage_from_wire(usage: &OpenAiUsage) -> Usage {
    Usage {
        prompt_tokens: usage.input_tokens,
        completion_tokens: usage.output_tokens,
        total_tokens: usage.total_tokens,
    }
}

// -- Stream conversion --

/// Stateful parser for `OpenAI` Responses SSE events.
///
/// Argument deltas arrive keyed by output item id, not call id; the mapping
/// is learned from `response.output_item.added` events. Completion is
/// signalled by the `[DONE]` sentinel.
pub struct OpenAiStreamParser {
    provider: String,
    /// output item id -> vendor call id
    call_ids: HashMap<String, String>,
    saw_tool_call: bool,
}

impl OpenAiStreamParser {
    /// Create a parser tagging chunks with the given provider id
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            call_ids: HashMap::new(),
            saw_tool_call: false,
        }
    }

    fn chunk(&self) -> StreamChunk {
        StreamChunk::empty(&self.provider)
    }

    /// Convert one decoded SSE event to a stream chunk, or `None` when the
    /// event carries nothing this layer consumes
    pub fn parse(&mut self, event: &SseEvent) -> Option<StreamChunk> {
        let data = match event {
            SseEvent::Done => {
                let mut chunk = self.chunk();
                chunk.done = true;
                return Some(chunk);
            }
            SseEvent::Data(data) => data,
        };

        let stream_event = match serde_json::from_str::<OpenAiStreamEvent>(data) {
            Ok(ev) => ev,
            Err(e) => {
                tracing::debug!(error = %e, "dropping unparseable OpenAI stream event");
                return None;
            }
        };

        match stream_event {
            OpenAiStreamEvent::OutputTextDelta { delta } => {
                let mut chunk = self.chunk();
                chunk.content = delta;
                Some(chunk)
            }
            OpenAiStreamEvent::OutputItemAdded { item } => match item {
                OpenAiOutputItem::FunctionCall { id, call_id, name, .. } => {
                    let call_id = call_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                    if let Some(item_id) = id {
                        self.call_ids.insert(item_id, call_id.clone());
                    }
                    self.saw_tool_call = true;
                    let mut chunk = self.chunk();
                    chunk.tool_calls.push(ToolCallDelta {
                        call_id,
                        name: Some(name),
                        arguments_delta: None,
                    });
                    Some(chunk)
                }
                _ => None,
            },
            OpenAiStreamEvent::FunctionCallArgumentsDelta { item_id, delta } => {
                let call_id = self.call_ids.get(&item_id).cloned().unwrap_or(item_id);
                let mut chunk = self.chunk();
                chunk.tool_calls.push(ToolCallDelta {
                    call_id,
                    name: None,
                    arguments_delta: Some(delta),
                });
                Some(chunk)
            }
            OpenAiStreamEvent::Created { response } => {
                let mut chunk = self.chunk();
                chunk.meta = ChunkMeta {
                    model: Some(response.model),
                    response_id: Some(response.id),
                    usage: None,
                    finish_reason: None,
                    error: None,
                };
                Some(chunk)
            }
            OpenAiStreamEvent::Completed { response } => {
                let finish_reason = if self.saw_tool_call {
                    FinishReason::ToolCalls
                } else {
                    map_status(
                        response.status.as_deref(),
                        response.incomplete_details.as_ref().and_then(|d| d.reason.as_deref()),
                    )
                };
                let mut chunk = self.chunk();
                chunk.meta = ChunkMeta {
                    model: Some(response.model),
                    response_id: Some(response.id),
                    usage: response.usage.as_ref().map(usage_from_wire),
                    finish_reason: Some(finish_reason),
                    error: None,
                };
                Some(chunk)
            }
            OpenAiStreamEvent::Failed { response } => {
                let message = response.error.as_ref().map_or_else(
                    || "provider reported a failed response".to_owned(),
                    |e| e.message.clone(),
                );
                let mut chunk = self.chunk();
                chunk.done = true;
                chunk.meta = ChunkMeta {
                    model: Some(response.model),
                    response_id: Some(response.id),
                    usage: response.usage.as_ref().map(usage_from_wire),
                    finish_reason: Some(FinishReason::Error),
                    error: Some(crate::error::LlmError::Unknown(message)),
                };
                Some(chunk)
            }
            OpenAiStreamEvent::Other => None,
        }
    }
}
