//! Scripted batch backend for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use ragjudge_core::JudgeError;

use crate::client::BatchLlm;
use crate::request::{BatchItemError, BatchOutcome, LlmBatchRequest, LlmBatchResponse};

enum Scripted {
    Text(String),
    Failure(String),
}

/// Batch backend with per-correlation-id scripted outcomes.
///
/// Requests with no script fail with a model error. Received batches are
/// recorded so tests can assert call counts and submitted requests.
pub struct MockBatchLlm {
    name: String,
    scripts: HashMap<String, Scripted>,
    reverse_order: bool,
    batches: Mutex<Vec<Vec<LlmBatchRequest>>>,
}

impl MockBatchLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scripts: HashMap::new(),
            reverse_order: false,
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Script a successful completion for the given correlation id.
    pub fn with_text(mut self, request_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.scripts.insert(request_id.into(), Scripted::Text(text.into()));
        self
    }

    /// Script a backend failure for the given correlation id.
    pub fn with_failure(
        mut self,
        request_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.scripts.insert(request_id.into(), Scripted::Failure(message.into()));
        self
    }

    /// Return outcomes in reversed order, for exercising callers that must
    /// not rely on positional pairing.
    pub fn with_reversed_order(mut self) -> Self {
        self.reverse_order = true;
        self
    }

    /// Number of `run_batch` calls received.
    pub fn batch_calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    /// Each received batch, in submission order.
    pub fn recorded_batches(&self) -> Vec<Vec<LlmBatchRequest>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchLlm for MockBatchLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run_batch(&self, requests: Vec<LlmBatchRequest>) -> Vec<BatchOutcome> {
        self.batches.lock().unwrap().push(requests.clone());

        let mut outcomes: Vec<BatchOutcome> = requests
            .into_iter()
            .map(|request| match self.scripts.get(&request.request_id) {
                Some(Scripted::Text(text)) => Ok(LlmBatchResponse {
                    request_id: request.request_id,
                    text: text.clone(),
                }),
                Some(Scripted::Failure(message)) => Err(BatchItemError {
                    request_id: request.request_id,
                    error: JudgeError::Model(message.clone()),
                }),
                None => Err(BatchItemError {
                    request_id: request.request_id,
                    error: JudgeError::Model("no scripted response".to_string()),
                }),
            })
            .collect();

        if self.reverse_order {
            outcomes.reverse();
        }
        outcomes
    }
}
