//! # ragjudge-eval
//!
//! LLM-delegated relevance judging for RAG outputs.
//!
//! Given a set of topics and a set of run responses, the judge builds one
//! evaluation prompt per response, dispatches them all as a single
//! concurrent batch to an LLM backend, parses each free-text reply into a
//! triple of bounded integer scores, and aggregates everything into a
//! per-run leaderboard under the `"Relevance"` measure.
//!
//! ```rust,ignore
//! use ragjudge_core::{RagResponse, Topic};
//! use ragjudge_eval::RelevanceJudge;
//! use ragjudge_model::LlmConfigSource;
//!
//! #[tokio::main]
//! async fn main() -> ragjudge_core::Result<()> {
//!     let topics = vec![Topic::new("t1", "What is 2+2?")];
//!     let responses = vec![RagResponse::new("r1", "t1", "four")];
//!
//!     let judge = RelevanceJudge::from_config(&LlmConfigSource::Env)?;
//!     let leaderboard = judge.judge(&responses, &topics).await?;
//!
//!     for entry in &leaderboard.entries {
//!         println!("{}: {:?}", entry.run_id, entry.aggregates);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Failure handling is deliberately forgiving at the item level: a backend
//! error or malformed reply scores that one response as zero and the run
//! continues. Only a configuration or dispatch failure that prevents any
//! request from being sent aborts the judging call.

pub mod judge;
pub mod prompt;
pub mod score;

pub use judge::{RELEVANCE_MEASURE, RelevanceJudge};
pub use prompt::{JUDGE_TEMPERATURE, build_request};
pub use score::{ScoreTriple, parse_relevance, parse_relevance_text};
