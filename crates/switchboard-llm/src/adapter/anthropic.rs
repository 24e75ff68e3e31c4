//! Adapter for the Anthropic Messages API

use http::{HeaderMap, HeaderValue, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ProviderAdapter, ProviderConfig, StreamParser, WireRequest, join_endpoint, raw_body_json};
use crate::convert::anthropic::{AnthropicStreamParser, tool_calls_from_raw};
use crate::error::{LlmError, normalize_error};
use crate::protocol::anthropic::{AnthropicRequest, AnthropicResponse};
use crate::sse::SseEvent;
use crate::types::{
    ChatRequest, ChatResponse, ContinuationContext, ContinuationState, Message, StreamChunk, ToolCall, ToolResult,
};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic Messages API.
///
/// The vendor holds no conversation state: tool continuations replay the
/// full message history with the tool results appended.
pub struct AnthropicAdapter {
    base_url: Option<Url>,
    api_key: Option<SecretString>,
}

impl AnthropicAdapter {
    /// Adapter under the default base URL
    #[must_use]
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self {
            base_url: None,
            api_key,
        }
    }

    /// Adapter from a provider configuration
    #[must_use]
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
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
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(key.expose_secret())
                .map_err(|_| LlmError::InvalidRequest("API key contains invalid header characters".to_owned()))?;
            headers.insert("x-api-key", value);
        }
        Ok(headers)
    }

    fn wire(&self, body: AnthropicRequest) -> Result<WireRequest, LlmError> {
        Ok(WireRequest {
            endpoint: join_endpoint(&self.base()?, "messages")?,
            headers: self.headers()?,
            body: serde_json::to_value(body)
                .map_err(|e| LlmError::InvalidRequest(format!("unserializable request: {e}")))?,
        })
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn id(&self) -> &str {
        "anthropic"
    }

    fn build_request(&self, request: &ChatRequest) -> Result<WireRequest, LlmError> {
        self.wire(AnthropicRequest::from(request))
    }

    fn parse_response(&self, status: StatusCode, body: &[u8]) -> ChatResponse {
        if status.is_client_error() || status.is_server_error() {
            return ChatResponse::failure(self.id(), normalize_error(status, body), raw_body_json(body));
        }
        match serde_json::from_slice::<AnthropicResponse>(body) {
            Ok(wire) => {
                let mut resp = ChatResponse::from(wire);
                resp.provider = self.id().to_owned();
                resp.raw = raw_body_json(body);
                resp
            }
            Err(e) => ChatResponse::failure(
                self.id(),
                LlmError::MalformedPayload(format!("unparseable response body: {e}")),
                raw_body_json(body),
            ),
        }
    }

    fn stream_parser(&self) -> Box<dyn StreamParser> {
        Box::new(AnthropicStreamParser::new(self.id()))
    }

    fn extract_tool_calls(&self, raw: &serde_json::Value) -> Vec<ToolCall> {
        tool_calls_from_raw(raw)
    }

    fn build_continuation(
        &self,
        results: &[ToolResult],
        context: &ContinuationContext,
    ) -> Result<WireRequest, LlmError> {
        let ContinuationState::History(history) = &context.state else {
            return Err(LlmError::MissingContinuationContext(
                "continuation requires the prior message history".to_owned(),
            ));
        };
        if history.is_empty() {
            return Err(LlmError::MissingContinuationContext(
                "prior message history is empty".to_owned(),
            ));
        }
        if results.is_empty() {
            return Err(LlmError::InvalidRequest("no tool results to send".to_owned()));
        }

        let mut messages = history.clone();
        messages.extend(
            results
                .iter()
                .map(|r| Message::tool_result(r.tool_call_id.clone(), r.output.clone())),
        );
        let request = ChatRequest::new(context.model.clone(), messages);
        self.wire(AnthropicRequest::from(&request))
    }
}

impl StreamParser for AnthropicStreamParser {
    fn parse_event(&mut self, event: &SseEvent) -> Option<StreamChunk> {
        self.parse(event)
    }
}
