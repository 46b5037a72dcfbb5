//! Batch request and response types.

use ragjudge_core::JudgeError;
use serde::{Deserialize, Serialize};

/// One chat message in an evaluation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// One evaluation request inside a batch.
///
/// `request_id` is a correlation id: unique within a batch, stable in
/// submission order, and echoed back on the matching outcome so callers can
/// re-associate results without relying on positional ordering.
#[derive(Debug, Clone)]
pub struct LlmBatchRequest {
    pub request_id: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
}

impl LlmBatchRequest {
    pub fn new(request_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self { request_id: request_id.into(), messages, temperature: None }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Successful completion for one batch item.
#[derive(Debug, Clone)]
pub struct LlmBatchResponse {
    pub request_id: String,
    pub text: String,
}

/// Failure for one batch item, tagged with the correlation id of the request
/// it belongs to.
#[derive(Debug)]
pub struct BatchItemError {
    pub request_id: String,
    pub error: JudgeError,
}

/// Per-item outcome. A failed item never aborts its batch.
pub type BatchOutcome = std::result::Result<LlmBatchResponse, BatchItemError>;

/// Correlation id of an outcome, whichever way the item went.
pub fn outcome_request_id(outcome: &BatchOutcome) -> &str {
    match outcome {
        Ok(response) => &response.request_id,
        Err(item) => &item.request_id,
    }
}
