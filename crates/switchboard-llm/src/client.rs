//! High-level client tying the registry, adapters, and transport together

use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use http::StatusCode;

use crate::adapter::WireRequest;
use crate::decode::StreamDecoder;
use crate::error::{LlmError, normalize_error};
use crate::registry::ProviderRegistry;
use crate::types::{ChatRequest, ChatResponse, ContinuationContext, StreamChunk, ToolCall, ToolResult, Usage};

/// Raw bytes off the wire, delivered as fragments with no alignment to
/// event boundaries
pub type ByteStream = BoxStream<'static, anyhow::Result<Vec<u8>>>;

/// Executes prepared wire requests.
///
/// The normalization layer never performs I/O itself; the transport is the
/// single collaborator that does. Retries and timeouts live here, guided by
/// [`LlmError::is_retryable`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a buffered request, returning the status and full body
    async fn execute(&self, request: &WireRequest) -> anyhow::Result<(StatusCode, Vec<u8>)>;

    /// Execute a streaming request, returning the status and body fragments
    async fn execute_stream(&self, request: &WireRequest) -> anyhow::Result<(StatusCode, ByteStream)>;
}

/// Client for normalized chat turns against any registered provider
pub struct ChatClient {
    registry: ProviderRegistry,
    transport: Box<dyn Transport>,
}

impl ChatClient {
    /// Create a client over a registry and transport
    #[must_use]
    pub fn new(registry: ProviderRegistry, transport: Box<dyn Transport>) -> Self {
        Self { registry, transport }
    }

    /// The registry this client dispatches through
    #[must_use]
    pub const fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Run one buffered turn.
    ///
    /// Vendor-side failures come back as a `ChatResponse` with
    /// `success = false`; an `Err` means the turn never produced a vendor
    /// response at all.
    pub async fn send(&self, provider: &str, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let adapter = self.registry.get(provider)?;
        request.validate()?;
        let wire = adapter.build_request(request)?;
        tracing::debug!(provider, model = %request.model, "sending chat request");
        let (status, body) = self.transport.execute(&wire).await.map_err(transport_error)?;
        let mut resp = adapter.parse_response(status, &body);
        // Gemini carries the model in the URL, not the body
        if resp.model.is_empty() {
            resp.model.clone_from(&request.model);
        }
        Ok(resp)
    }

    /// Run one streaming turn, pushing each normalized chunk to `on_chunk`.
    ///
    /// The returned response is accumulated from the chunks. Exactly one
    /// chunk carries `done = true`; a transport that closes before it
    /// surfaces as an error.
    pub async fn stream(
        &self,
        provider: &str,
        request: &ChatRequest,
        mut on_chunk: impl FnMut(&StreamChunk) + Send,
    ) -> Result<ChatResponse, LlmError> {
        let adapter = self.registry.get(provider)?;
        request.validate()?;

        let mut streaming_request = request.clone();
        streaming_request.stream = true;
        let wire = adapter.build_request(&streaming_request)?;

        tracing::debug!(provider, model = %request.model, "opening chat stream");
        let (status, mut fragments) = self.transport.execute_stream(&wire).await.map_err(transport_error)?;

        if status.is_client_error() || status.is_server_error() {
            let mut body = Vec::new();
            while let Some(fragment) = fragments.next().await {
                body.extend(fragment.map_err(transport_error)?);
            }
            return Err(normalize_error(status, &body));
        }

        let mut decoder = StreamDecoder::new(adapter.stream_parser());
        let mut accumulator = StreamAccumulator::new(adapter.id());

        while let Some(fragment) = fragments.next().await {
            let fragment = fragment.map_err(transport_error)?;
            for chunk in decoder.push(&fragment) {
                accumulator.push(&chunk);
                on_chunk(&chunk);
            }
        }
        if let Some(chunk) = decoder.finish()? {
            accumulator.push(&chunk);
            on_chunk(&chunk);
        }

        let mut resp = accumulator.into_response();
        if resp.model.is_empty() {
            resp.model.clone_from(&request.model);
        }
        Ok(resp)
    }

    /// Feed tool results back and run the follow-up turn
    pub async fn continue_with_tool_results(
        &self,
        provider: &str,
        results: &[ToolResult],
        context: &ContinuationContext,
    ) -> Result<ChatResponse, LlmError> {
        let adapter = self.registry.get(provider)?;
        let wire = adapter.build_continuation(results, context)?;
        tracing::debug!(provider, model = %context.model, "sending tool continuation");
        let (status, body) = self.transport.execute(&wire).await.map_err(transport_error)?;
        let mut resp = adapter.parse_response(status, &body);
        if resp.model.is_empty() {
            resp.model.clone_from(&context.model);
        }
        Ok(resp)
    }
}

fn transport_error(e: anyhow::Error) -> LlmError {
    LlmError::UpstreamUnavailable(format!("transport error: {e:#}"))
}

/// Assembles a complete response out of a chunk sequence.
///
/// Tool calls are stitched together per call id, preserving the order each
/// id was first seen.
struct StreamAccumulator {
    provider: String,
    content: String,
    call_order: Vec<String>,
    calls: HashMap<String, PartialCall>,
    model: Option<String>,
    response_id: Option<String>,
    usage: Option<Usage>,
    finish_reason: Option<crate::types::FinishReason>,
    error: Option<LlmError>,
}

#[derive(Default)]
struct PartialCall {
    name: Option<String>,
    arguments: String,
}

impl StreamAccumulator {
    fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            content: String::new(),
            call_order: Vec::new(),
            calls: HashMap::new(),
            model: None,
            response_id: None,
            usage: None,
            finish_reason: None,
            error: None,
        }
    }

    fn push(&mut self, chunk: &StreamChunk) {
        self.content.push_str(&chunk.content);
        for delta in &chunk.tool_calls {
            let call = match self.calls.entry(delta.call_id.clone()) {
                std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
                std::collections::hash_map::Entry::Vacant(e) => {
                    self.call_order.push(delta.call_id.clone());
                    e.insert(PartialCall::default())
                }
            };
            if let Some(name) = &delta.name {
                call.name = Some(name.clone());
            }
            if let Some(arguments) = &delta.arguments_delta {
                call.arguments.push_str(arguments);
            }
        }
        if chunk.meta.model.is_some() {
            self.model.clone_from(&chunk.meta.model);
        }
        if chunk.meta.response_id.is_some() {
            self.response_id.clone_from(&chunk.meta.response_id);
        }
        if chunk.meta.usage.is_some() {
            self.usage.clone_from(&chunk.meta.usage);
        }
        if chunk.meta.finish_reason.is_some() {
            self.finish_reason = chunk.meta.finish_reason;
        }
        if chunk.meta.error.is_some() {
            self.error.clone_from(&chunk.meta.error);
        }
    }

    fn into_response(mut self) -> ChatResponse {
        let tool_calls: Vec<ToolCall> = self
            .call_order
            .iter()
            .filter_map(|id| {
                let call = self.calls.remove(id)?;
                Some(ToolCall::from_raw_arguments(
                    id.clone(),
                    call.name.unwrap_or_default(),
                    &call.arguments,
                ))
            })
            .collect();

        let finish_reason = if tool_calls.is_empty() {
            self.finish_reason.unwrap_or(crate::types::FinishReason::Stop)
        } else {
            crate::types::FinishReason::ToolCalls
        };

        // Failed turns always carry an error, even if the vendor gave none
        let error = (finish_reason == crate::types::FinishReason::Error).then(|| {
            self.error
                .unwrap_or_else(|| LlmError::Unknown("provider reported a failed response".to_owned()))
        });

        ChatResponse {
            success: error.is_none(),
            content: self.content,
            tool_calls,
            usage: self.usage.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            response_id: self.response_id,
            finish_reason,
            error,
            provider: self.provider,
            raw: None,
        }
    }
}
