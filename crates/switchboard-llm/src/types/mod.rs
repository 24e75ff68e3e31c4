//! Provider-agnostic data model shared by all adapters

mod message;
mod request;
mod response;
mod stream;
mod tool;

pub use message::{Message, Role};
pub use request::ChatRequest;
pub use response::{ChatResponse, ContinuationContext, ContinuationState, FinishReason, Usage};
pub use stream::{ChunkMeta, StreamChunk, ToolCallDelta};
pub use tool::{ToolCall, ToolDefinition, ToolResult};
