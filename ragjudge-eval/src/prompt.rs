//! Evaluation prompt assembly.

use ragjudge_model::{ChatMessage, LlmBatchRequest};

/// Sampling temperature for judging. Moderate on purpose: low enough to keep
/// scores repeatable, high enough that the two paraphrases stay distinct.
pub const JUDGE_TEMPERATURE: f32 = 0.5;

const SYSTEM_PROMPT: &str = "You are a relevance evaluator that evaluates the relevance between a query and a response.\n\
Step 1: Generate exactly two paraphrases of the query.\n\
Step 2: Score relevance between the query and response (0 to 3) for:\n\
- Original query\n\
- Query Paraphrase 1\n\
- Query Paraphrase 2\n\n\
Return ONLY three integers separated by spaces which represents the relevance between each query and the response.\n\
Example: 2 1 3";

/// Build the evaluation request for one response.
///
/// The paraphrases the model is asked to generate stay internal to the model;
/// only the three integers come back. The correlation id `q{index}` is unique
/// within a batch and stable in submission order. Pure; no I/O.
pub fn build_request(index: usize, query: &str, response_text: &str) -> LlmBatchRequest {
    LlmBatchRequest::new(
        format!("q{index}"),
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("Query: {query}\n\nResponse: {response_text}")),
        ],
    )
    .with_temperature(JUDGE_TEMPERATURE)
}
