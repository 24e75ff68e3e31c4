//! Conversion between internal types and the Gemini `generateContent` wire
//! format

use crate::protocol::google::{
    GoogleContent, GoogleFunctionCall, GoogleFunctionDeclaration, GoogleFunctionResponse, GoogleGenerationConfig,
    GooglePart, GoogleRequest, GoogleResponse, GoogleTool,
};
use crate::sse::SseEvent;
use crate::types::{
    ChatRequest, ChatResponse, ChunkMeta, FinishReason, Role, StreamChunk, ToolCall, ToolCallDelta, Usage,
};

// -- Outbound: internal request -> Gemini wire format --

impl From<&ChatRequest> for GoogleRequest {
    fn from(req: &ChatRequest) -> Self {
        let mut system: Vec<&str> = Vec::new();
        let mut contents = Vec::new();

        for msg in &req.messages {
            match msg.role {
                Role::System => system.push(&msg.content),
                Role::User => contents.push(internal_message_to_google(msg, "user")),
                Role::Assistant => contents.push(internal_message_to_google(msg, "model")),
                Role::Tool => {
                    if let Some(tool_call_id) = &msg.tool_call_id {
                        // functionResponse.response must be a JSON object
                        let response = serde_json::from_str::<serde_json::Value>(&msg.content)
                            .ok()
                            .filter(serde_json::Value::is_object)
                            .unwrap_or_else(|| serde_json::json!({"result": msg.content}));
                        contents.push(GoogleContent {
                            role: Some("function".to_owned()),
                            parts: vec![GooglePart::FunctionResponse(GoogleFunctionResponse {
                                name: function_name_from_call_id(tool_call_id),
                                response,
                            })],
                        });
                    }
                }
            }
        }

        let system_instruction = if system.is_empty() {
            None
        } else {
            Some(GoogleContent {
                role: None,
                parts: vec![GooglePart::Text(system.join("\n\n"))],
            })
        };

        let tools = req.tools.as_ref().map(|tools| {
            vec![GoogleTool {
                function_declarations: tools
                    .iter()
                    .map(|t| GoogleFunctionDeclaration {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: t.parameters.clone(),
                    })
                    .collect(),
            }]
        });

        Self {
            contents,
            system_instruction,
            generation_config: Some(GoogleGenerationConfig {
                temperature: req.temperature,
                max_output_tokens: req.max_tokens,
            }),
            tools,
        }
    }
}

/// Convert an internal message to a Gemini content object
fn internal_message_to_google(msg: &crate::types::Message, role: &str) -> GoogleContent {
    let mut parts = Vec::new();

    if !msg.content.is_empty() {
        parts.push(GooglePart::Text(msg.content.clone()));
    }

    if let Some(tool_calls) = &msg.tool_calls {
        for tc in tool_calls {
            parts.push(GooglePart::FunctionCall(GoogleFunctionCall {
                name: tc.name.clone(),
                args: tc.arguments.clone(),
            }));
        }
    }

    if parts.is_empty() {
        parts.push(GooglePart::Text(String::new()));
    }

    GoogleContent {
        role: Some(role.to_owned()),
        parts,
    }
}

/// Derive a call id for a `functionCall` part.
///
/// Gemini assigns no call ids; a deterministic one is derived from the
/// function name so that parsing the same payload twice yields identical
/// results and the continuation path can recover the name.
fn call_id_for_function(name: &str) -> String {
    format!("call_{name}")
}

/// Recover the function name from a generated Gemini call id
fn function_name_from_call_id(call_id: &str) -> String {
    call_id.strip_prefix("call_").unwrap_or(call_id).to_owned()
}

// -- Inbound: Gemini wire response -> internal types --

impl From<GoogleResponse> for ChatResponse {
    fn from(resp: GoogleResponse) -> Self {
        let mut content = String::new();
        let mut tool_calls = Vec::new();
        let mut finish_reason = FinishReason::Unknown;

        for candidate in &resp.candidates {
            if let Some(candidate_content) = &candidate.content {
                for part in &candidate_content.parts {
                    match part {
                        GooglePart::Text(text) => content.push_str(text),
                        GooglePart::FunctionCall(fc) => {
                            tool_calls.push(ToolCall {
                                id: call_id_for_function(&fc.name),
                                name: fc.name.clone(),
                                arguments: fc.args.clone(),
                            });
                        }
                        GooglePart::FunctionResponse(_) | GooglePart::Other(_) => {}
                    }
                }
            }
            if let Some(reason) = candidate.finish_reason.as_deref() {
                finish_reason = map_finish_reason(reason);
            }
        }

        if !tool_calls.is_empty() {
            finish_reason = FinishReason::ToolCalls;
        }

        Self {
            success: true,
            content,
            tool_calls,
            usage: resp.usage_metadata.as_ref().map(usage_from_wire).unwrap_or_default(),
            // The model id lives in the request URL; the client fills it in
            model: resp.model_version.unwrap_or_default(),
            response_id: resp.response_id,
            finish_reason,
            error: None,
            provider: String::new(),
            raw: None,
        }
    }
}

/// Collect every `functionCall` part in a raw `generateContent` payload
pub fn tool_calls_from_raw(raw: &serde_json::Value) -> Vec<ToolCall> {
    let Ok(resp) = serde_json::from_value::<GoogleResponse>(raw.clone()) else {
        return Vec::new();
    };
    ChatResponse::from(resp).tool_calls
}

/// Map a Gemini finish reason to the internal enum
fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        _ => FinishReason::Unknown,
    }
}

fn usage_from_wire(usage: &crate::protocol::google::GoogleUsageMetadata) -> Usage {
    Usage {
        prompt_tokens: usage.prompt_token_count,
        completion_tokens: usage.candidates_token_count,
        total_tokens: usage.total_token_count,
    }
}

// -- Stream conversion --

/// Parser for Gemini streaming, where each SSE data line is a complete
/// `generateContent` response carrying incremental candidate content.
///
/// Completion is detected by a candidate carrying a finish reason; Gemini
/// emits neither a sentinel nor a typed terminal event.
pub struct GoogleStreamParser {
    provider: String,
}

impl GoogleStreamParser {
    /// Create a parser tagging chunks with the given provider id
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }

    /// Convert one decoded SSE event to a stream chunk, or `None` when the
    /// event carries nothing this layer consumes
    pub fn parse(&mut self, event: &SseEvent) -> Option<StreamChunk> {
        // Gemini does not use the [DONE] sentinel
        let SseEvent::Data(data) = event else {
            return None;
        };

        let resp = match serde_json::from_str::<GoogleResponse>(data) {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(error = %e, "dropping unparseable Gemini stream event");
                return None;
            }
        };

        let mut chunk = StreamChunk::empty(&self.provider);
        let mut finish_reason = None;

        for candidate in &resp.candidates {
            if let Some(candidate_content) = &candidate.content {
                for part in &candidate_content.parts {
                    match part {
                        GooglePart::Text(text) => chunk.content.push_str(text),
                        GooglePart::FunctionCall(fc) => {
                            // Gemini delivers complete arguments in one part
                            chunk.tool_calls.push(ToolCallDelta {
                                call_id: call_id_for_function(&fc.name),
                                name: Some(fc.name.clone()),
                                arguments_delta: Some(fc.args.to_string()),
                            });
                        }
                        GooglePart::FunctionResponse(_) | GooglePart::Other(_) => {}
                    }
                }
            }
            if let Some(reason) = candidate.finish_reason.as_deref() {
                finish_reason = Some(map_finish_reason(reason));
                chunk.done = true;
            }
        }

        chunk.meta = ChunkMeta {
            model: resp.model_version,
            response_id: resp.response_id,
            usage: resp.usage_metadata.as_ref().map(usage_from_wire),
            finish_reason,
            error: None,
        };

        if chunk.content.is_empty() && chunk.tool_calls.is_empty() && !chunk.done && chunk.meta.usage.is_none() {
            return None;
        }

        Some(chunk)
    }
}
