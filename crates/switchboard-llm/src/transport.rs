//! HTTP transport over reqwest

use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use http::StatusCode;

use crate::adapter::WireRequest;
use crate::client::{ByteStream, Transport};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Transport backed by a pooled reqwest client
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport with the default request timeout
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Transport with an explicit request timeout.
    ///
    /// The timeout covers the whole buffered request; streaming responses
    /// are exempt so long turns are not cut off mid-stream.
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    fn post(&self, request: &WireRequest) -> reqwest::RequestBuilder {
        self.client
            .post(request.endpoint.clone())
            .headers(request.headers.clone())
            .json(&request.body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &WireRequest) -> anyhow::Result<(StatusCode, Vec<u8>)> {
        let response = self
            .post(request)
            .send()
            .await
            .with_context(|| format!("POST {}", request.endpoint))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("reading response body from {}", request.endpoint))?;
        Ok((status, body.to_vec()))
    }

    async fn execute_stream(&self, request: &WireRequest) -> anyhow::Result<(StatusCode, ByteStream)> {
        let response = self
            .post(request)
            .timeout(Duration::from_secs(600))
            .send()
            .await
            .with_context(|| format!("POST {}", request.endpoint))?;
        let status = response.status();
        let fragments = response
            .bytes_stream()
            .map_ok(|bytes| bytes.to_vec())
            .map_err(anyhow::Error::from)
            .boxed();
        Ok((status, fragments))
    }
}
