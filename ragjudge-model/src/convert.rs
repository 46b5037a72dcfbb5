//! Wire types for the OpenAI-compatible chat completions endpoint.

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::request::{ChatMessage, LlmBatchRequest};

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Response choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Option<AssistantMessage>,
    pub finish_reason: Option<String>,
}

/// Assistant message inside a choice.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Build the wire request for one batch item.
pub fn build_request(config: &LlmConfig, request: &LlmBatchRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: request.messages.clone(),
        temperature: request.temperature,
        max_tokens: config.max_tokens,
    }
}

/// Text of the first choice, if the model returned any.
pub fn first_choice_text(response: &ChatCompletionResponse) -> Option<String> {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.as_ref())
        .and_then(|message| message.content.clone())
}
