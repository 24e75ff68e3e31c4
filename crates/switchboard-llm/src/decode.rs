//! Stream chunk decoding: raw transport fragments in, normalized chunks out.
//!
//! [`StreamDecoder`] pairs the SSE reassembly layer with a provider stream
//! parser and enforces the chunk contract: every turn yields exactly one
//! chunk with `done = true`, and a transport that closes early surfaces an
//! error instead of silently truncating the reply.

use crate::adapter::StreamParser;
use crate::error::LlmError;
use crate::sse::SseDecoder;
use crate::types::StreamChunk;

/// Push-driven decoder for one streaming turn.
///
/// Create one per request via the provider's adapter; it is single-use and
/// carries all per-turn parser state.
pub struct StreamDecoder {
    sse: SseDecoder,
    parser: Box<dyn StreamParser>,
    done: bool,
}

impl StreamDecoder {
    /// Create a decoder around a provider stream parser
    #[must_use]
    pub fn new(parser: Box<dyn StreamParser>) -> Self {
        Self {
            sse: SseDecoder::new(),
            parser,
            done: false,
        }
    }

    /// Feed a raw transport fragment, returning the chunks it completed.
    ///
    /// Events arriving after the terminal chunk are dropped, so callers see
    /// at most one chunk with `done = true`.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamChunk> {
        let mut chunks = Vec::new();
        for event in self.sse.push(bytes) {
            if self.done {
                break;
            }
            if let Some(chunk) = self.parser.parse_event(&event) {
                self.done = chunk.done;
                chunks.push(chunk);
            }
        }
        chunks
    }

    /// Signal that the transport closed.
    ///
    /// Flushes any event left buffered without a trailing blank line and
    /// verifies the stream reached its terminal chunk.
    pub fn finish(&mut self) -> Result<Option<StreamChunk>, LlmError> {
        let mut last = None;
        if let Some(event) = self.sse.finish()
            && !self.done
            && let Some(chunk) = self.parser.parse_event(&event)
        {
            self.done = chunk.done;
            last = Some(chunk);
        }
        if self.done {
            Ok(last)
        } else {
            Err(LlmError::UpstreamUnavailable(
                "stream closed before completion".to_owned(),
            ))
        }
    }

    /// Whether the terminal chunk has been seen
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }
}
