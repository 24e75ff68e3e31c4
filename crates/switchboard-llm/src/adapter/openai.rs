//! Adapter for the `OpenAI` Responses API

use http::{HeaderMap, HeaderValue, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ProviderAdapter, ProviderConfig, StreamParser, WireRequest, join_endpoint, raw_body_json};
use crate::convert::openai::{OpenAiStreamParser, tool_calls_from_raw};
use crate::error::{LlmError, normalize_error};
use crate::protocol::openai::{OpenAiInputItem, OpenAiRequest, OpenAiResponse};
use crate::sse::SseEvent;
use crate::types::{
    ChatRequest, ChatResponse, ContinuationContext, ContinuationState, StreamChunk, ToolCall, ToolResult,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Adapter for `OpenAI` and `OpenAI`-compatible vendors.
///
/// Conversation state is server-side: tool continuations reference the
/// previous response by id instead of replaying history.
pub struct OpenAiAdapter {
    id: String,
    base_url: Option<Url>,
    api_key: Option<SecretString>,
}

impl OpenAiAdapter {
    /// Adapter for `OpenAI` itself, under the default base URL
    #[must_use]
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self {
            id: "openai".to_owned(),
            base_url: None,
            api_key,
        }
    }

    /// Adapter serving an arbitrary provider id and base URL
    #[must_use]
    pub fn with_id(id: impl Into<String>, config: &ProviderConfig) -> Self {
        Self {
            id: id.into(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn base(&self) -> Result<Url, LlmError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| LlmError::InvalidRequest(format!("invalid base URL: {e}"))),
        }
    }

    fn headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let bearer = format!("Bearer {}", key.expose_secret());
            let value = HeaderValue::from_str(&bearer)
                .map_err(|_| LlmError::InvalidRequest("API key contains invalid header characters".to_owned()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn wire(&self, body: OpenAiRequest) -> Result<WireRequest, LlmError> {
        Ok(WireRequest {
            endpoint: join_endpoint(&self.base()?, "responses")?,
            headers: self.headers()?,
            body: serde_json::to_value(body)
                .map_err(|e| LlmError::InvalidRequest(format!("unserializable request: {e}")))?,
        })
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn build_request(&self, request: &ChatRequest) -> Result<WireRequest, LlmError> {
        self.wire(OpenAiRequest::from(request))
    }

    fn parse_response(&self, status: StatusCode, body: &[u8]) -> ChatResponse {
        if status.is_client_error() || status.is_server_error() {
            return ChatResponse::failure(&self.id, normalize_error(status, body), raw_body_json(body));
        }
        match serde_json::from_slice::<OpenAiResponse>(body) {
            Ok(wire) => {
                let mut resp = ChatResponse::from(wire);
                resp.provider = self.id.clone();
                resp.raw = raw_body_json(body);
                resp
            }
            Err(e) => ChatResponse::failure(
                &self.id,
                LlmError::MalformedPayload(format!("unparseable response body: {e}")),
                raw_body_json(body),
            ),
        }
    }

    fn stream_parser(&self) -> Box<dyn StreamParser> {
        Box::new(OpenAiStreamParser::new(self.id.clone()))
    }

    fn extract_tool_calls(&self, raw: &serde_json::Value) -> Vec<ToolCall> {
        tool_calls_from_raw(raw)
    }

    fn build_continuation(
        &self,
        results: &[ToolResult],
        context: &ContinuationContext,
    ) -> Result<WireRequest, LlmError> {
        let ContinuationState::ResponseId(previous_id) = &context.state else {
            return Err(LlmError::MissingContinuationContext(
                "continuation requires the previous response id".to_owned(),
            ));
        };
        if previous_id.is_empty() {
            return Err(LlmError::MissingContinuationContext(
                "previous response id is empty".to_owned(),
            ));
        }
        if results.is_empty() {
            return Err(LlmError::InvalidRequest("no tool results to send".to_owned()));
        }

        let input = results
            .iter()
            .map(|r| OpenAiInputItem::FunctionCallOutput {
                call_id: r.tool_call_id.clone(),
                output: r.output.clone(),
            })
            .collect();

        self.wire(OpenAiRequest {
            model: context.model.clone(),
            input,
            instructions: None,
            temperature: None,
            max_output_tokens: None,
            previous_response_id: Some(previous_id.clone()),
            tools: None,
            stream: None,
        })
    }
}

impl StreamParser for OpenAiStreamParser {
    fn parse_event(&mut self, event: &SseEvent) -> Option<StreamChunk> {
        self.parse(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    fn adapter() -> OpenAiAdapter {
        OpenAiAdapter::new(Some(SecretString::from("sk-test")))
    }

    #[test]
    fn build_request_targets_responses_endpoint() {
        let req = ChatRequest::new("gpt-4.1", vec![Message::user("hi")]);
        let wire = adapter().build_request(&req).unwrap();
        assert_eq!(wire.endpoint.as_str(), "https://api.openai.com/v1/responses");
        assert_eq!(
            wire.headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer sk-test"
        );
        assert_eq!(wire.body["model"], "gpt-4.1");
    }

    #[test]
    fn error_status_becomes_failure_with_raw_body() {
        let resp = adapter().parse_response(
            StatusCode::UNAUTHORIZED,
            br#"{"error":{"message":"bad key"}}"#,
        );
        assert!(!resp.success);
        assert_eq!(resp.provider, "openai");
        assert_eq!(resp.error, Some(LlmError::Auth("bad key".to_owned())));
        assert!(resp.raw.is_some());
    }

    #[test]
    fn malformed_success_body_becomes_malformed_payload() {
        let resp = adapter().parse_response(StatusCode::OK, b"<html>");
        assert!(!resp.success);
        assert!(matches!(resp.error, Some(LlmError::MalformedPayload(_))));
    }

    #[test]
    fn continuation_references_previous_response() {
        let context = ContinuationContext::response_id("gpt-4.1", "resp_1");
        let results = [ToolResult {
            tool_call_id: "call_a".to_owned(),
            output: "42".to_owned(),
        }];
        let wire = adapter().build_continuation(&results, &context).unwrap();
        assert_eq!(wire.body["previous_response_id"], "resp_1");
        assert_eq!(wire.body["input"][0]["type"], "function_call_output");
        assert_eq!(wire.body["input"][0]["call_id"], "call_a");
    }

    #[test]
    fn continuation_without_response_id_is_rejected() {
        let context = ContinuationContext::history("gpt-4.1", vec![Message::user("hi")]);
        let results = [ToolResult {
            tool_call_id: "call_a".to_owned(),
            output: "42".to_owned(),
        }];
        let err = adapter().build_continuation(&results, &context).unwrap_err();
        assert!(matches!(err, LlmError::MissingContinuationContext(_)));
    }
}
