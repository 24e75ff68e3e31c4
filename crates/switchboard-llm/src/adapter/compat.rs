//! Adapter for vendors exposing an `OpenAI`-compatible API

use http::StatusCode;

use super::{OpenAiAdapter, ProviderAdapter, ProviderConfig, StreamParser, WireRequest};
use crate::error::LlmError;
use crate::types::{ChatRequest, ChatResponse, ContinuationContext, ToolCall, ToolResult};

/// Adapter for a vendor speaking the `OpenAI` wire format under its own base
/// URL (xAI, `DeepSeek`).
///
/// Everything delegates to [`OpenAiAdapter`]; only the provider id tagged
/// onto responses and chunks differs, so two aliases never masquerade as
/// each other downstream.
pub struct OpenAiCompatAdapter {
    inner: OpenAiAdapter,
}

impl OpenAiCompatAdapter {
    /// Adapter with the given provider id; the configuration must carry the
    /// vendor's base URL
    pub fn new(id: impl Into<String>, config: &ProviderConfig) -> Result<Self, LlmError> {
        let id = id.into();
        if config.base_url.is_none() {
            return Err(LlmError::InvalidRequest(format!(
                "provider '{id}' requires a base URL"
            )));
        }
        Ok(Self {
            inner: OpenAiAdapter::with_id(id, config),
        })
    }
}

impl ProviderAdapter for OpenAiCompatAdapter {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn build_request(&self, request: &ChatRequest) -> Result<WireRequest, LlmError> {
        self.inner.build_request(request)
    }

    fn parse_response(&self, status: StatusCode, body: &[u8]) -> ChatResponse {
        self.inner.parse_response(status, body)
    }

    fn stream_parser(&self) -> Box<dyn StreamParser> {
        self.inner.stream_parser()
    }

    fn extract_tool_calls(&self, raw: &serde_json::Value) -> Vec<ToolCall> {
        self.inner.extract_tool_calls(raw)
    }

    fn build_continuation(
        &self,
        results: &[ToolResult],
        context: &ContinuationContext,
    ) -> Result<WireRequest, LlmError> {
        self.inner.build_continuation(results, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ProviderKind;
    use crate::types::Message;
    use url::Url;

    #[test]
    fn alias_requests_target_the_alias_base_url() {
        let config = ProviderConfig::new(ProviderKind::OpenAiCompat)
            .with_base_url(Url::parse("https://api.x.ai/v1").unwrap())
            .with_api_key("xai-test");
        let adapter = OpenAiCompatAdapter::new("xai", &config).unwrap();
        assert_eq!(adapter.id(), "xai");

        let req = ChatRequest::new("grok-4", vec![Message::user("hi")]);
        let wire = adapter.build_request(&req).unwrap();
        assert_eq!(wire.endpoint.as_str(), "https://api.x.ai/v1/responses");
    }

    #[test]
    fn responses_are_tagged_with_the_alias_id() {
        let config = ProviderConfig::new(ProviderKind::OpenAiCompat)
            .with_base_url(Url::parse("https://api.deepseek.com/v1").unwrap());
        let adapter = OpenAiCompatAdapter::new("deepseek", &config).unwrap();
        let resp = adapter.parse_response(StatusCode::SERVICE_UNAVAILABLE, b"down");
        assert_eq!(resp.provider, "deepseek");
    }

    #[test]
    fn missing_base_url_is_rejected() {
        let config = ProviderConfig::new(ProviderKind::OpenAiCompat);
        assert!(matches!(
            OpenAiCompatAdapter::new("xai", &config),
            Err(LlmError::InvalidRequest(_))
        ));
    }
}
