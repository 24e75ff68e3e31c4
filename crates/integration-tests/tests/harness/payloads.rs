//! Canned vendor payloads, one module per provider family

/// `OpenAI` Responses API payloads
pub mod openai {
    pub fn text_response() -> serde_json::Value {
        serde_json::json!({
            "id": "resp_abc",
            "model": "gpt-4.1",
            "status": "completed",
            "output": [
                {"type": "message",
                 "content": [{"type": "output_text", "text": "Paris is the capital of France."}]}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 8, "total_tokens": 20}
        })
    }

    pub fn tool_call_response() -> serde_json::Value {
        serde_json::json!({
            "id": "resp_tool",
            "model": "gpt-4.1",
            "status": "completed",
            "output": [
                {"type": "function_call", "id": "fc_1", "call_id": "call_w1",
                 "name": "get_weather", "arguments": "{\"city\":\"Paris\"}"}
            ],
            "usage": {"input_tokens": 20, "output_tokens": 6, "total_tokens": 26}
        })
    }

    /// A full streamed turn: text in two deltas, then the sentinel
    pub fn text_stream() -> Vec<Vec<u8>> {
        vec![
            b"data: {\"type\":\"response.created\",\"response\":{\"id\":\"resp_s\",\"model\":\"gpt-4.1\",\"output\":[]}}\n\n".to_vec(),
            b"data: {\"type\":\"response.output_text.delta\",\"delta\":\"Par\"}\n\n".to_vec(),
            b"data: {\"type\":\"response.output_text.delta\",\"delta\":\"is\"}\n\n".to_vec(),
            b"data: {\"type\":\"response.completed\",\"response\":{\"id\":\"resp_s\",\"model\":\"gpt-4.1\",\"status\":\"completed\",\"output\":[],\"usage\":{\"input_tokens\":5,\"output_tokens\":2,\"total_tokens\":7}}}\n\n".to_vec(),
            b"data: [DONE]\n\n".to_vec(),
        ]
    }
}

/// Anthropic Messages API payloads
pub mod anthropic {
    pub fn text_response() -> serde_json::Value {
        serde_json::json!({
            "id": "msg_abc",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-0",
            "content": [{"type": "text", "text": "Paris is the capital of France."}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 8}
        })
    }

    pub fn tool_call_response() -> serde_json::Value {
        serde_json::json!({
            "id": "msg_tool",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-0",
            "content": [
                {"type": "text", "text": "Let me check."},
                {"type": "tool_use", "id": "toolu_w1", "name": "get_weather",
                 "input": {"city": "Paris"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 20, "output_tokens": 15}
        })
    }

    /// A full streamed turn ending with the typed `message_stop` event
    pub fn text_stream() -> Vec<Vec<u8>> {
        vec![
            b"data: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_s\",\"model\":\"claude-sonnet-4-0\",\"content\":[],\"usage\":{\"input_tokens\":5,\"output_tokens\":0}}}\n\n".to_vec(),
            b"data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Par\"}}\n\n".to_vec(),
            b"data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"is\"}}\n\n".to_vec(),
            b"data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"end_turn\"},\"usage\":{\"input_tokens\":5,\"output_tokens\":2}}\n\n".to_vec(),
            b"data: {\"type\":\"message_stop\"}\n\n".to_vec(),
        ]
    }
}

/// Gemini `generateContent` payloads
pub mod google {
    pub fn text_response() -> serde_json::Value {
        serde_json::json!({
            "candidates": [
                {"content": {"role": "model",
                             "parts": [{"text": "Paris is the capital of France."}]},
                 "finishReason": "STOP", "index": 0}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20},
            "modelVersion": "gemini-2.5-flash"
        })
    }

    pub fn tool_call_response() -> serde_json::Value {
        serde_json::json!({
            "candidates": [
                {"content": {"role": "model",
                             "parts": [{"functionCall": {"name": "get_weather",
                                                         "args": {"city": "Paris"}}}]},
                 "finishReason": "STOP", "index": 0}
            ],
            "usageMetadata": {"promptTokenCount": 20, "candidatesTokenCount": 6, "totalTokenCount": 26}
        })
    }

    /// A full streamed turn; completion rides on the final `finishReason`
    pub fn text_stream() -> Vec<Vec<u8>> {
        vec![
            b"data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Par\"}]},\"index\":0}]}\n\n".to_vec(),
            b"data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"is\"}]},\"finishReason\":\"STOP\",\"index\":0}],\"usageMetadata\":{\"promptTokenCount\":5,\"candidatesTokenCount\":2,\"totalTokenCount\":7}}\n\n".to_vec(),
        ]
    }
}
