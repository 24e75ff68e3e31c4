use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::message::Message;
use super::tool::ToolDefinition;
use crate::error::LlmError;

/// Internal canonical chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages, oldest first
    pub messages: Vec<Message>,
    /// Tool definitions available to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    /// Sampling temperature (0.0 to 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Whether to stream the response
    #[serde(default)]
    pub stream: bool,
}

impl ChatRequest {
    /// Create a request with the given model and messages
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            temperature: None,
            max_tokens: None,
            stream: false,
        }
    }

    /// Check the request invariants: non-empty message sequence, unique tool
    /// names, temperature within range.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::InvalidRequest` describing the first violation.
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.messages.is_empty() {
            return Err(LlmError::InvalidRequest("message sequence is empty".to_owned()));
        }

        if let Some(temperature) = self.temperature
            && !(0.0..=1.0).contains(&temperature)
        {
            return Err(LlmError::InvalidRequest(format!(
                "temperature {temperature} outside [0, 1]"
            )));
        }

        if let Some(tools) = &self.tools {
            let mut seen = HashSet::new();
            for tool in tools {
                if !seen.insert(tool.name.as_str()) {
                    return Err(LlmError::InvalidRequest(format!(
                        "duplicate tool name: {}",
                        tool.name
                    )));
                }
            }
        }

        Ok(())
    }
}
