//! Provider adapters.
//!
//! An adapter owns everything vendor-specific about one provider: endpoint
//! and header construction, request and response conversion, stream event
//! parsing, and tool-continuation assembly. The rest of the crate speaks
//! only the internal data model and dispatches through [`ProviderAdapter`]
//! trait objects.

use http::{HeaderMap, StatusCode};
use url::Url;

use crate::error::LlmError;
use crate::sse::SseEvent;
use crate::types::{ChatRequest, ChatResponse, ContinuationContext, StreamChunk, ToolCall, ToolResult};

mod anthropic;
mod compat;
mod google;
mod openai;

pub use anthropic::AnthropicAdapter;
pub use compat::OpenAiCompatAdapter;
pub use google::GoogleAdapter;
pub use openai::OpenAiAdapter;

/// A fully prepared HTTP request for a provider, ready for a transport to
/// execute
#[derive(Debug, Clone)]
pub struct WireRequest {
    /// Absolute endpoint URL
    pub endpoint: Url,
    /// Vendor-specific headers, credentials included
    pub headers: HeaderMap,
    /// JSON request body
    pub body: serde_json::Value,
}

/// Vendor-specific behavior behind a uniform interface.
///
/// Implementations are stateless; all per-turn state lives in the
/// [`StreamParser`] they hand out.
pub trait ProviderAdapter: Send + Sync {
    /// Provider id this adapter serves, as registered
    fn id(&self) -> &str;

    /// Convert an internal request into a wire request for this vendor
    fn build_request(&self, request: &ChatRequest) -> Result<WireRequest, LlmError>;

    /// Convert a vendor HTTP response into the internal model.
    ///
    /// Vendor failures become a `ChatResponse` with `success = false` and a
    /// normalized error rather than an `Err`; the raw body is retained for
    /// diagnosis.
    fn parse_response(&self, status: StatusCode, body: &[u8]) -> ChatResponse;

    /// Create a fresh per-turn stream parser
    fn stream_parser(&self) -> Box<dyn StreamParser>;

    /// Project the tool calls out of a raw vendor payload without a full
    /// parse
    fn extract_tool_calls(&self, raw: &serde_json::Value) -> Vec<ToolCall>;

    /// Build the follow-up wire request that feeds tool results back to the
    /// vendor
    fn build_continuation(
        &self,
        results: &[ToolResult],
        context: &ContinuationContext,
    ) -> Result<WireRequest, LlmError>;
}

/// Per-turn conversion of decoded SSE events into normalized chunks
pub trait StreamParser: Send {
    /// Convert one event, or `None` when it carries nothing for callers
    fn parse_event(&mut self, event: &SseEvent) -> Option<StreamChunk>;
}

/// Which adapter implementation a configured provider uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// `OpenAI` Responses API
    OpenAi,
    /// Anthropic Messages API
    Anthropic,
    /// Gemini `generateContent` API
    Google,
    /// A vendor exposing an `OpenAI`-compatible API under its own base URL
    OpenAiCompat,
}

/// Configuration for one registered provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Adapter implementation to use
    pub kind: ProviderKind,
    /// Base URL override; required for [`ProviderKind::OpenAiCompat`]
    pub base_url: Option<Url>,
    /// API credential
    pub api_key: Option<secrecy::SecretString>,
}

impl ProviderConfig {
    /// Configuration using the vendor's default base URL
    #[must_use]
    pub const fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            base_url: None,
            api_key: None,
        }
    }

    /// Set the API credential
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<secrecy::SecretString>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }
}

/// Join a path onto a base URL, tolerating a missing trailing slash
pub(crate) fn join_endpoint(base: &Url, path: &str) -> Result<Url, LlmError> {
    let mut base_str = base.as_str().trim_end_matches('/').to_owned();
    base_str.push('/');
    base_str.push_str(path);
    Url::parse(&base_str).map_err(|e| LlmError::InvalidRequest(format!("invalid endpoint URL: {e}")))
}

/// Parse a raw body into JSON for diagnostic retention, if possible
pub(crate) fn raw_body_json(body: &[u8]) -> Option<serde_json::Value> {
    serde_json::from_slice(body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_endpoint_tolerates_trailing_slash() {
        let with = Url::parse("https://api.example.com/v1/").unwrap();
        let without = Url::parse("https://api.example.com/v1").unwrap();
        assert_eq!(
            join_endpoint(&with, "responses").unwrap(),
            join_endpoint(&without, "responses").unwrap()
        );
        assert_eq!(
            join_endpoint(&with, "responses").unwrap().as_str(),
            "https://api.example.com/v1/responses"
        );
    }
}
