//! Error taxonomy and vendor error normalization

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest raw-body excerpt carried into an error message
const MAX_RAW_MESSAGE_LEN: usize = 200;

/// Closed error taxonomy for the normalization layer.
///
/// The enum is `Clone`/serde so a failed turn can carry its error inside a
/// `ChatResponse`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LlmError {
    /// Provider id is not present in the registry
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Caller supplied a malformed request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Vendor rejected the credentials
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Vendor rate limit hit
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Vendor is unavailable or returned a server error
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Vendor payload could not be parsed
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Tool continuation was requested without usable conversation context
    #[error("missing continuation context: {0}")]
    MissingContinuationContext(String),

    /// Anything the taxonomy cannot classify
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl LlmError {
    /// Whether a transport may reasonably retry the turn.
    ///
    /// The layer itself never retries; this is advisory for the transport
    /// collaborator.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::UpstreamUnavailable(_))
    }
}

/// Map an HTTP status and vendor error body onto the taxonomy.
///
/// Status codes take precedence; otherwise the body is checked for known
/// vendor error shapes in a fixed order.
pub fn normalize_error(status: StatusCode, body: &[u8]) -> LlmError {
    let message = extract_error_message(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited(message),
        StatusCode::BAD_REQUEST => LlmError::InvalidRequest(message),
        s if s.is_server_error() => LlmError::UpstreamUnavailable(message),
        _ => classify_by_body(body, message),
    }
}

/// Classify an error body by its vendor-specific code when the status alone
/// is not conclusive
fn classify_by_body(body: &[u8], message: String) -> LlmError {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return LlmError::Unknown(message);
    };

    // Numeric codes (Google puts the HTTP status in `error.code`) are
    // skipped in favor of the string fields
    let code = ["/error/type", "/error/code", "/error/status"]
        .iter()
        .find_map(|path| value.pointer(path).and_then(serde_json::Value::as_str))
        .unwrap_or_default();

    match code {
        "authentication_error" | "invalid_api_key" | "PERMISSION_DENIED" | "UNAUTHENTICATED" => {
            LlmError::Auth(message)
        }
        "rate_limit_error" | "rate_limit_exceeded" | "RESOURCE_EXHAUSTED" => LlmError::RateLimited(message),
        "invalid_request_error" | "INVALID_ARGUMENT" => LlmError::InvalidRequest(message),
        "overloaded_error" | "UNAVAILABLE" => LlmError::UpstreamUnavailable(message),
        _ => LlmError::Unknown(message),
    }
}

/// Pull a human-readable message out of a vendor error body.
///
/// Shapes are tried in a fixed precedence: nested `error.message`, `error`
/// as a bare string, top-level `message`, then a truncated raw excerpt.
fn extract_error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(message) = value.pointer("/error/message").and_then(serde_json::Value::as_str)
            && !message.is_empty()
        {
            return message.to_owned();
        }
        if let Some(message) = value.get("error").and_then(serde_json::Value::as_str)
            && !message.is_empty()
        {
            return message.to_owned();
        }
        if let Some(message) = value.get("message").and_then(serde_json::Value::as_str)
            && !message.is_empty()
        {
            return message.to_owned();
        }
    }

    let raw = String::from_utf8_lossy(body);
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "provider returned an error with no body".to_owned();
    }
    let mut excerpt: String = trimmed.chars().take(MAX_RAW_MESSAGE_LEN).collect();
    if trimmed.chars().count() > MAX_RAW_MESSAGE_LEN {
        excerpt.push('…');
    }
    excerpt
}
