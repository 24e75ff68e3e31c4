//! Scriptable in-memory transport

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::StreamExt;
use http::StatusCode;
use switchboard_llm::{ByteStream, Transport, WireRequest};

/// Transport returning scripted responses and recording every request it
/// executes
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<(StatusCode, Vec<u8>)>>,
    streams: Mutex<VecDeque<(StatusCode, Vec<Vec<u8>>)>>,
    requests: Arc<Mutex<Vec<WireRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a buffered response
    pub fn respond(self, status: StatusCode, body: &serde_json::Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.to_string().into_bytes()));
        self
    }

    /// Queue a raw buffered response
    pub fn respond_raw(self, status: StatusCode, body: &[u8]) -> Self {
        self.responses.lock().unwrap().push_back((status, body.to_vec()));
        self
    }

    /// Queue a streaming response delivered as the given fragments
    pub fn respond_stream(self, status: StatusCode, fragments: &[&[u8]]) -> Self {
        self.streams
            .lock()
            .unwrap()
            .push_back((status, fragments.iter().map(|f| f.to_vec()).collect()));
        self
    }

    /// Handle to the requests recorded so far
    pub fn requests(&self) -> Arc<Mutex<Vec<WireRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &WireRequest) -> anyhow::Result<(StatusCode, Vec<u8>)> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted response left"))
    }

    async fn execute_stream(&self, request: &WireRequest) -> anyhow::Result<(StatusCode, ByteStream)> {
        self.requests.lock().unwrap().push(request.clone());
        let (status, fragments) = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted stream left"))?;
        Ok((status, futures_util::stream::iter(fragments.into_iter().map(Ok)).boxed()))
    }
}
