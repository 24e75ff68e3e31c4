//! Multi-provider LLM wire-protocol normalization.
//!
//! Five vendor APIs, one data model: requests, responses, stream chunks,
//! and tool-continuation turns all cross a single internal representation
//! regardless of which provider serves them. Vendor specifics live behind
//! [`adapter::ProviderAdapter`] trait objects dispatched through an
//! explicit [`registry::ProviderRegistry`].
//!
//! The crate performs no I/O of its own. Buffered and streaming execution
//! go through the [`client::Transport`] collaborator; parsing is
//! push-driven, so any byte source can feed a
//! [`decode::StreamDecoder`].

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod adapter;
pub mod client;
pub mod convert;
pub mod decode;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod sse;
pub mod transport;
pub mod types;

pub use adapter::{ProviderAdapter, ProviderConfig, ProviderKind, StreamParser, WireRequest};
pub use client::{ByteStream, ChatClient, Transport};
pub use decode::StreamDecoder;
pub use error::{LlmError, normalize_error};
pub use registry::ProviderRegistry;
pub use sse::{SseDecoder, SseEvent};
pub use transport::HttpTransport;
pub use types::{
    ChatRequest, ChatResponse, ChunkMeta, ContinuationContext, ContinuationState, FinishReason, Message, Role,
    StreamChunk, ToolCall, ToolCallDelta, ToolDefinition, ToolResult, Usage,
};
