//! Batch client seam and the OpenAI-compatible implementation.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use ragjudge_core::{JudgeError, Result};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::convert::{self, ChatCompletionResponse};
use crate::request::{BatchItemError, BatchOutcome, LlmBatchRequest, LlmBatchResponse};
use crate::retry::{RetryConfig, execute_with_retry, is_retryable_model_error};

/// An LLM backend that executes a whole batch of evaluation requests.
///
/// `run_batch` is invoked exactly once per judging call. Outcomes mirror the
/// input order, each tagged with its request's correlation id; an individual
/// item failure is reported as an `Err` outcome and never aborts the batch.
#[async_trait]
pub trait BatchLlm: Send + Sync {
    fn name(&self) -> &str;

    async fn run_batch(&self, requests: Vec<LlmBatchRequest>) -> Vec<BatchOutcome>;
}

/// Batch client for any OpenAI-compatible chat completions endpoint.
pub struct OpenAiBatchLlm {
    client: Client,
    config: LlmConfig,
    retry_config: RetryConfig,
}

impl OpenAiBatchLlm {
    /// Create a new client from a resolved config.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| JudgeError::Model(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config, retry_config: RetryConfig::default() })
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Build the API URL for chat completions.
    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.config.effective_base_url().trim_end_matches('/'))
    }

    async fn dispatch_item(&self, request: LlmBatchRequest) -> BatchOutcome {
        let request_id = request.request_id.clone();
        debug!(request_id = %request_id, "dispatching batch item");
        match self.complete(&request).await {
            Ok(text) => Ok(LlmBatchResponse { request_id, text }),
            Err(error) => {
                warn!(request_id = %request_id, error = %error, "batch item failed");
                Err(BatchItemError { request_id, error })
            }
        }
    }

    async fn complete(&self, request: &LlmBatchRequest) -> Result<String> {
        let api_url = self.api_url();
        let body = convert::build_request(&self.config, request);

        let response =
            execute_with_retry(&self.retry_config, is_retryable_model_error, || {
                let client = self.client.clone();
                let api_url = api_url.clone();
                let api_key = self.config.api_key.clone();
                let body = body.clone();
                async move {
                    let response = client
                        .post(&api_url)
                        .header("Authorization", format!("Bearer {}", api_key))
                        .header("Content-Type", "application/json")
                        .json(&body)
                        .send()
                        .await
                        .map_err(|e| {
                            JudgeError::Model(format!("chat completion request failed: {}", e))
                        })?;

                    if !response.status().is_success() {
                        let status = response.status().as_u16();
                        let error_text = response.text().await.unwrap_or_default();
                        // Carry the status structurally so retry classification
                        // never depends on what the error body happens to say.
                        return Err(JudgeError::ModelHttp { status, message: error_text });
                    }

                    Ok(response)
                }
            })
            .await?;

        let response_text = response
            .text()
            .await
            .map_err(|e| JudgeError::Model(format!("Failed to read response: {}", e)))?;

        let completion: ChatCompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                JudgeError::Model(format!("Failed to parse response: {} - {}", e, response_text))
            })?;

        convert::first_choice_text(&completion)
            .ok_or_else(|| JudgeError::Model("Empty completion: no assistant content".to_string()))
    }
}

#[async_trait]
impl BatchLlm for OpenAiBatchLlm {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn run_batch(&self, requests: Vec<LlmBatchRequest>) -> Vec<BatchOutcome> {
        let concurrency = self.config.concurrency.max(1);
        info!(items = requests.len(), model = %self.config.model, "dispatching batch");

        // `buffered` keeps outcomes in request order while still running up
        // to `concurrency` items in flight.
        stream::iter(requests)
            .map(|request| self.dispatch_item(request))
            .buffered(concurrency)
            .collect()
            .await
    }
}
