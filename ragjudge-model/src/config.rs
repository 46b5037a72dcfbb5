//! Backend configuration and its explicit resolution step.

use ragjudge_core::{JudgeError, Result};
use serde::{Deserialize, Serialize};

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default judge model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default number of in-flight requests per batch.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Fully-specified configuration for the batch backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Optional custom base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum tokens for output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Number of batch items dispatched concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl LlmConfig {
    /// Create a new config with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            max_tokens: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set max tokens for output.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set per-batch dispatch concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Get the effective base URL.
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Build a config from a raw JSON mapping.
    pub fn from_value(raw: &serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(raw.clone())?;
        config.validate()
    }

    /// Build a config from `RAGJUDGE_*` environment variables, falling back
    /// to `OPENAI_API_KEY` for the key.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("RAGJUDGE_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .map_err(|_| {
                JudgeError::Config(
                    "no API key: set RAGJUDGE_API_KEY or OPENAI_API_KEY".to_string(),
                )
            })?;
        let model = std::env::var("RAGJUDGE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let mut config = Self::new(api_key, model);
        if let Ok(base_url) = std::env::var("RAGJUDGE_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        config.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.api_key.is_empty() {
            return Err(JudgeError::Config("api_key must not be empty".to_string()));
        }
        if self.model.is_empty() {
            return Err(JudgeError::Config("model must not be empty".to_string()));
        }
        Ok(self)
    }
}

/// Where a judging call gets its backend configuration from.
///
/// Resolution happens exactly once, at call entry; nothing downstream of
/// [`LlmConfigSource::resolve`] reads the environment.
#[derive(Debug, Clone)]
pub enum LlmConfigSource {
    /// Raw JSON mapping supplied by the caller.
    Raw(serde_json::Value),
    /// Derive everything from the environment.
    Env,
}

impl LlmConfigSource {
    /// Resolve to a fully-specified [`LlmConfig`].
    pub fn resolve(&self) -> Result<LlmConfig> {
        match self {
            Self::Raw(raw) => LlmConfig::from_value(raw),
            Self::Env => LlmConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    // Serializes the tests that mutate process environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_from_value_full() {
        let raw = json!({
            "api_key": "sk-test",
            "model": "local-judge",
            "base_url": "http://localhost:8080/v1",
            "max_tokens": 64,
            "concurrency": 4,
        });
        let config = LlmConfig::from_value(&raw).unwrap();
        assert_eq!(config.model, "local-judge");
        assert_eq!(config.effective_base_url(), "http://localhost:8080/v1");
        assert_eq!(config.max_tokens, Some(64));
        assert_eq!(config.concurrency, 4);
    }

    #[test]
    fn test_from_value_defaults() {
        let raw = json!({ "api_key": "sk-test" });
        let config = LlmConfig::from_value(&raw).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.effective_base_url(), DEFAULT_API_BASE);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_from_value_rejects_empty_key() {
        let raw = json!({ "api_key": "" });
        let result = LlmConfig::from_value(&raw);
        assert!(matches!(result, Err(JudgeError::Config(_))));
    }

    #[test]
    fn test_raw_mapping_wins_over_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("RAGJUDGE_API_KEY", "sk-env");
            std::env::set_var("RAGJUDGE_MODEL", "env-model");
        }

        let raw = json!({ "api_key": "sk-raw", "model": "raw-model" });
        let config = LlmConfigSource::Raw(raw).resolve().unwrap();
        assert_eq!(config.api_key, "sk-raw");
        assert_eq!(config.model, "raw-model");

        unsafe {
            std::env::remove_var("RAGJUDGE_API_KEY");
            std::env::remove_var("RAGJUDGE_MODEL");
        }
    }

    #[test]
    fn test_env_source_reads_variables() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("RAGJUDGE_API_KEY", "sk-env");
            std::env::set_var("RAGJUDGE_MODEL", "env-model");
            std::env::set_var("RAGJUDGE_BASE_URL", "http://env.test/v1");
        }

        let config = LlmConfigSource::Env.resolve().unwrap();
        assert_eq!(config.api_key, "sk-env");
        assert_eq!(config.model, "env-model");
        assert_eq!(config.effective_base_url(), "http://env.test/v1");

        unsafe {
            std::env::remove_var("RAGJUDGE_API_KEY");
            std::env::remove_var("RAGJUDGE_MODEL");
            std::env::remove_var("RAGJUDGE_BASE_URL");
        }
    }

    #[test]
    fn test_builder_methods() {
        let config = LlmConfig::new("sk", "m")
            .with_base_url("http://example.test/v1")
            .with_max_tokens(32)
            .with_concurrency(2);
        assert_eq!(config.effective_base_url(), "http://example.test/v1");
        assert_eq!(config.max_tokens, Some(32));
        assert_eq!(config.concurrency, 2);
    }
}
