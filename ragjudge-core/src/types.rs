use serde::{Deserialize, Serialize};

/// One query every evaluated run is expected to answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: String,
    /// Free-text problem statement. May be absent for placeholder topics.
    pub statement: Option<String>,
}

impl Topic {
    pub fn new(topic_id: impl Into<String>, statement: impl Into<String>) -> Self {
        Self { topic_id: topic_id.into(), statement: Some(statement.into()) }
    }

    /// Topic with no problem statement.
    pub fn untitled(topic_id: impl Into<String>) -> Self {
        Self { topic_id: topic_id.into(), statement: None }
    }

    pub fn statement_or_empty(&self) -> &str {
        self.statement.as_deref().unwrap_or("")
    }
}

/// One run's rendered answer to one topic.
///
/// A (run, topic) pair is expected to be unique but this is not enforced;
/// duplicates simply produce duplicate judging work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    pub run_id: String,
    pub topic_id: String,
    /// Rendered response body. `None` when the run produced no answer.
    pub text: Option<String>,
}

impl RagResponse {
    pub fn new(
        run_id: impl Into<String>,
        topic_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self { run_id: run_id.into(), topic_id: topic_id.into(), text: Some(text.into()) }
    }

    /// Response with no content.
    pub fn empty(run_id: impl Into<String>, topic_id: impl Into<String>) -> Self {
        Self { run_id: run_id.into(), topic_id: topic_id.into(), text: None }
    }

    /// Lowercased body, or the empty string when the response has no content.
    pub fn rendered_text(&self) -> String {
        self.text.as_deref().map(str::to_lowercase).unwrap_or_default()
    }
}
