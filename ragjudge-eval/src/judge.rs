//! The judging orchestrator.

use std::collections::HashMap;
use std::sync::Arc;

use ragjudge_core::{
    Leaderboard, LeaderboardBuilder, LeaderboardSpec, OnMissing, RagResponse, Result, Topic,
};
use ragjudge_model::{
    BatchLlm, BatchOutcome, LlmBatchRequest, LlmConfigSource, OpenAiBatchLlm, outcome_request_id,
};
use tracing::{info, warn};

use crate::prompt;
use crate::score::{self, ScoreTriple};

/// Name of the measure this judge contributes to the leaderboard.
pub const RELEVANCE_MEASURE: &str = "Relevance";

/// LLM-delegated relevance judge for RAG outputs.
pub struct RelevanceJudge {
    model: Arc<dyn BatchLlm>,
}

impl RelevanceJudge {
    pub fn new(model: Arc<dyn BatchLlm>) -> Self {
        Self { model }
    }

    /// Resolve the backend configuration once, up front, and judge through
    /// an OpenAI-compatible client built from it. Nothing downstream reads
    /// the environment.
    pub fn from_config(source: &LlmConfigSource) -> Result<Self> {
        let config = source.resolve()?;
        Ok(Self::new(Arc::new(OpenAiBatchLlm::new(config)?)))
    }

    /// Judge every response against its topic and aggregate per-run
    /// relevance into a leaderboard.
    ///
    /// One evaluation request per response, in input order, submitted as a
    /// single batch; that batch call is the only suspension point. A
    /// response whose topic id is unknown is judged against an empty query.
    /// Individual item failures degrade to the zero score; only a failure to
    /// construct or dispatch the batch at all escapes as an error.
    pub async fn judge(&self, responses: &[RagResponse], topics: &[Topic]) -> Result<Leaderboard> {
        let statements: HashMap<&str, &str> =
            topics.iter().map(|t| (t.topic_id.as_str(), t.statement_or_empty())).collect();
        let expected_topic_ids: Vec<String> =
            topics.iter().map(|t| t.topic_id.clone()).collect();

        let mut pending: Vec<(String, String, LlmBatchRequest)> =
            Vec::with_capacity(responses.len());
        for (index, response) in responses.iter().enumerate() {
            let query = statements.get(response.topic_id.as_str()).copied().unwrap_or("");
            let request = prompt::build_request(index, query, &response.rendered_text());
            pending.push((response.run_id.clone(), response.topic_id.clone(), request));
        }

        info!(items = pending.len(), model = self.model.name(), "judging relevance batch");
        let requests: Vec<LlmBatchRequest> =
            pending.iter().map(|(_, _, request)| request.clone()).collect();
        let outcomes = self.model.run_batch(requests).await;

        // Re-associate outcomes through the correlation id carried on both
        // success and failure; positional ordering from the backend is not
        // trusted.
        let mut by_id: HashMap<String, BatchOutcome> = HashMap::with_capacity(outcomes.len());
        for outcome in outcomes {
            by_id.insert(outcome_request_id(&outcome).to_string(), outcome);
        }

        let mut builder = LeaderboardBuilder::new(LeaderboardSpec::single(RELEVANCE_MEASURE));
        for (run_id, topic_id, request) in &pending {
            let triple = match by_id.remove(request.request_id.as_str()) {
                Some(outcome) => score::parse_relevance(&outcome),
                None => {
                    warn!(
                        request_id = %request.request_id,
                        run_id = %run_id,
                        "batch returned no outcome for request, scoring zero"
                    );
                    ScoreTriple::ZERO
                }
            };
            let values = HashMap::from([(RELEVANCE_MEASURE.to_string(), triple.mean())]);
            builder.add(run_id, topic_id, values);
        }
        for request_id in by_id.keys() {
            warn!(request_id = %request_id, "outcome for a request id that was never submitted");
        }

        builder.build(&expected_topic_ids, OnMissing::FixAggregate)
    }
}
