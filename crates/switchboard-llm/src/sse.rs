//! Push-driven server-sent events decoder.
//!
//! Transports hand over raw byte fragments as they arrive off the wire;
//! fragment boundaries carry no meaning and routinely split lines, events,
//! and even UTF-8 sequences. The decoder buffers bytes until a complete
//! line is available, so no caller ever observes a partial record.

/// A decoded server-sent event, reduced to what the stream layer consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A data payload, with multi-line `data:` fields already joined
    Data(String),
    /// The `[DONE]` sentinel some providers send to terminate a stream
    Done,
}

/// Incremental SSE decoder fed by raw transport fragments.
///
/// Bytes are buffered internally and only decoded once a full line is
/// present, which also keeps multi-byte UTF-8 sequences split across
/// fragments intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    /// Create an empty decoder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a fragment of bytes, returning every event completed by it
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(line) = self.take_line() {
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush any event left pending after the transport closes.
    ///
    /// Streams that end without a trailing blank line still deliver their
    /// final event this way.
    pub fn finish(&mut self) -> Option<SseEvent> {
        // An unterminated final line still counts once the stream is over
        if !self.buffer.is_empty() {
            let line = String::from_utf8_lossy(&self.buffer).into_owned();
            self.buffer.clear();
            if let Some(event) = self.process_line(&line) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    /// Remove and return the next complete line from the buffer, if any
    fn take_line(&mut self) -> Option<String> {
        let newline = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Handle one complete line, returning an event when a blank line
    /// dispatches accumulated data
    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        // Comment lines (used as keep-alives) are discarded
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        // Only the data field matters here; event/id/retry are ignored
        if field == "data" {
            self.data_lines.push(value.to_owned());
        }
        None
    }

    /// Assemble accumulated data lines into an event
    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.data_lines.is_empty() {
            return None;
        }
        let data = self.data_lines.join("\n");
        self.data_lines.clear();
        if data == "[DONE]" {
            Some(SseEvent::Done)
        } else {
            Some(SseEvent::Data(data))
        }
    }
}
