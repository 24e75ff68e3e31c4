//! Adapter for the Gemini `generateContent` API

use http::{HeaderMap, HeaderValue, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ProviderAdapter, ProviderConfig, StreamParser, WireRequest, raw_body_json};
use crate::convert::google::{GoogleStreamParser, tool_calls_from_raw};
use crate::error::{LlmError, normalize_error};
use crate::protocol::google::{GoogleRequest, GoogleResponse};
use crate::sse::SseEvent;
use crate::types::{
    ChatRequest, ChatResponse, ContinuationContext, ContinuationState, Message, StreamChunk, ToolCall, ToolResult,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Adapter for the Gemini `generateContent` API.
///
/// The model id lives in the URL path rather than the request body, and
/// streaming uses a separate method name with an `alt=sse` query.
pub struct GoogleAdapter {
    base_url: Option<Url>,
    api_key: Option<SecretString>,
}

impl GoogleAdapter {
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

    fn endpoint(&self, model: &str, streaming: bool) -> Result<Url, LlmError> {
        let base = match &self.base_url {
            Some(url) => url.as_str().trim_end_matches('/').to_owned(),
            None => DEFAULT_BASE_URL.to_owned(),
        };
        let url = if streaming {
            format!("{base}/models/{model}:streamGenerateContent?alt=sse")
        } else {
            format!("{base}/models/{model}:generateContent")
        };
        Url::parse(&url).map_err(|e| LlmError::InvalidRequest(format!("invalid endpoint URL: {e}")))
    }

    fn headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(key.expose_secret())
                .map_err(|_| LlmError::InvalidRequest("API key contains invalid header characters".to_owned()))?;
            headers.insert("x-goog-api-key", value);
        }
        Ok(headers)
    }

    fn wire(&self, model: &str, streaming: bool, body: GoogleRequest) -> Result<WireRequest, LlmError> {
        Ok(WireRequest {
            endpoint: self.endpoint(model, streaming)?,
            headers: self.headers()?,
            body: serde_json::to_value(body)
                .map_err(|e| LlmError::InvalidRequest(format!("unserializable request: {e}")))?,
        })
    }
}

impl ProviderAdapter for GoogleAdapter {
    fn id(&self) -> &str {
        "google"
    }

    fn build_request(&self, request: &ChatRequest) -> Result<WireRequest, LlmError> {
        self.wire(&request.model, request.stream, GoogleRequest::from(request))
    }

    fn parse_response(&self, status: StatusCode, body: &[u8]) -> ChatResponse {
        if status.is_client_error() || status.is_server_error() {
            return ChatResponse::failure(self.id(), normalize_error(status, body), raw_body_json(body));
        }
        match serde_json::from_slice::<GoogleResponse>(body) {
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
        Box::new(GoogleStreamParser::new(self.id()))
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
        self.wire(&context.model, false, GoogleRequest::from(&request))
    }
}

impl StreamParser for GoogleStreamParser {
    fn parse_event(&mut self, event: &SseEvent) -> Option<StreamChunk> {
        self.parse(event)
    }
}
