//! # ragjudge-model
//!
//! Batched LLM backend for the ragjudge relevance judge. Provides the
//! [`BatchLlm`] seam the judge dispatches through, an OpenAI-compatible
//! implementation over HTTP with per-item retry and failure isolation, and
//! a scripted mock for tests.

pub mod client;
pub mod config;
pub mod convert;
pub mod mock;
pub mod request;
pub mod retry;

pub use client::{BatchLlm, OpenAiBatchLlm};
pub use config::{LlmConfig, LlmConfigSource};
pub use mock::MockBatchLlm;
pub use request::{
    BatchItemError, BatchOutcome, ChatMessage, LlmBatchRequest, LlmBatchResponse,
    outcome_request_id,
};
pub use retry::RetryConfig;
