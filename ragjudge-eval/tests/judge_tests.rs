//! End-to-end judging scenarios against a scripted backend.

use std::sync::Arc;

use ragjudge_core::{JudgeError, RagResponse, Topic};
use ragjudge_eval::{RELEVANCE_MEASURE, RelevanceJudge};
use ragjudge_model::{LlmConfigSource, MockBatchLlm};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::builder().from_env_lossy())
        .try_init();
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn successful_judging_end_to_end() {
    init_tracing();
    let topics = vec![Topic::new("t1", "What is 2+2?")];
    let responses = vec![RagResponse::new("r1", "t1", "four")];
    let mock = Arc::new(MockBatchLlm::new("mock-judge").with_text("q0", "3 2 3"));

    let judge = RelevanceJudge::new(mock.clone());
    let board = judge.judge(&responses, &topics).await.unwrap();

    let score = board.aggregate("r1", RELEVANCE_MEASURE).unwrap();
    assert!(close(score, 8.0 / 3.0), "expected 2.667, got {score}");
    assert_eq!(mock.batch_calls(), 1);
}

#[tokio::test]
async fn backend_failure_scores_zero() {
    init_tracing();
    let topics = vec![Topic::new("t1", "What is 2+2?")];
    let responses = vec![RagResponse::new("r1", "t1", "four")];
    let mock = Arc::new(MockBatchLlm::new("mock-judge").with_failure("q0", "backend down"));

    let judge = RelevanceJudge::new(mock);
    let board = judge.judge(&responses, &topics).await.unwrap();

    assert_eq!(board.aggregate("r1", RELEVANCE_MEASURE), Some(0.0));
}

#[tokio::test]
async fn one_batch_call_with_one_request_per_response() {
    init_tracing();
    let topics = vec![Topic::new("t1", "first"), Topic::new("t2", "second")];
    let responses = vec![
        RagResponse::new("alpha", "t1", "a"),
        RagResponse::new("alpha", "t2", "b"),
        RagResponse::new("beta", "t1", "c"),
    ];
    let mock = Arc::new(
        MockBatchLlm::new("mock-judge")
            .with_text("q0", "3 3 3")
            .with_text("q1", "1 1 1")
            .with_text("q2", "2 2 2"),
    );

    let judge = RelevanceJudge::new(mock.clone());
    let board = judge.judge(&responses, &topics).await.unwrap();

    assert_eq!(mock.batch_calls(), 1);
    let batch = &mock.recorded_batches()[0];
    let ids: Vec<&str> = batch.iter().map(|r| r.request_id.as_str()).collect();
    assert_eq!(ids, vec!["q0", "q1", "q2"]);

    // alpha: mean of 3.0 and 1.0; beta: 2.0 over its single topic.
    assert!(close(board.aggregate("alpha", RELEVANCE_MEASURE).unwrap(), 2.0));
    assert!(close(board.aggregate("beta", RELEVANCE_MEASURE).unwrap(), 2.0));
    assert_eq!(board.entry("beta").unwrap().topics_scored, 1);
}

#[tokio::test]
async fn unknown_topic_judges_against_empty_query() {
    init_tracing();
    let topics = vec![Topic::new("t1", "known topic")];
    let responses = vec![RagResponse::new("r1", "missing-topic", "Some Answer")];
    let mock = Arc::new(MockBatchLlm::new("mock-judge").with_text("q0", "0 0 1"));

    let judge = RelevanceJudge::new(mock.clone());
    let board = judge.judge(&responses, &topics).await.unwrap();

    let batch = &mock.recorded_batches()[0];
    let user = &batch[0].messages[1].content;
    assert!(user.starts_with("Query: \n\n"), "query must be empty, got: {user}");
    // The response body is lowercased before prompting.
    assert!(user.contains("Response: some answer"));

    // The unknown topic is outside the expected set, so the run aggregates
    // over zero scored topics.
    assert_eq!(board.aggregate("r1", RELEVANCE_MEASURE), Some(0.0));
    assert_eq!(board.entry("r1").unwrap().topics_scored, 0);
}

#[tokio::test]
async fn reordered_outcomes_still_pair_correctly() {
    init_tracing();
    let topics = vec![Topic::new("t1", "first"), Topic::new("t2", "second")];
    let responses =
        vec![RagResponse::new("good", "t1", "a"), RagResponse::new("bad", "t2", "b")];
    let mock = Arc::new(
        MockBatchLlm::new("mock-judge")
            .with_text("q0", "3 3 3")
            .with_text("q1", "0 0 0")
            .with_reversed_order(),
    );

    let judge = RelevanceJudge::new(mock);
    let board = judge.judge(&responses, &topics).await.unwrap();

    // Positional zipping would hand q1's zeros to "good".
    assert!(close(board.aggregate("good", RELEVANCE_MEASURE).unwrap(), 3.0));
    assert_eq!(board.aggregate("bad", RELEVANCE_MEASURE), Some(0.0));
}

#[tokio::test]
async fn missing_topics_fix_the_aggregate() {
    init_tracing();
    let topics = vec![Topic::new("t1", "first"), Topic::new("t2", "second")];
    let responses = vec![
        RagResponse::new("full", "t1", "a"),
        RagResponse::new("full", "t2", "b"),
        RagResponse::new("partial", "t1", "c"),
    ];
    let mock = Arc::new(
        MockBatchLlm::new("mock-judge")
            .with_text("q0", "3 3 3")
            .with_text("q1", "1 1 1")
            .with_text("q2", "3 3 3"),
    );

    let judge = RelevanceJudge::new(mock);
    let board = judge.judge(&responses, &topics).await.unwrap();

    // "partial" averages over only its scored topic and outranks "full".
    assert!(close(board.aggregate("partial", RELEVANCE_MEASURE).unwrap(), 3.0));
    assert!(close(board.aggregate("full", RELEVANCE_MEASURE).unwrap(), 2.0));
    let order: Vec<&str> = board.entries.iter().map(|e| e.run_id.as_str()).collect();
    assert_eq!(order, vec!["partial", "full"]);
}

#[tokio::test]
async fn malformed_output_scores_zero_but_run_completes() {
    init_tracing();
    let topics = vec![Topic::new("t1", "first")];
    let responses =
        vec![RagResponse::new("ok", "t1", "a"), RagResponse::new("mangled", "t1", "b")];
    let mock = Arc::new(
        MockBatchLlm::new("mock-judge")
            .with_text("q0", "2 2 2")
            .with_text("q1", "I would rate this highly relevant!"),
    );

    let judge = RelevanceJudge::new(mock);
    let board = judge.judge(&responses, &topics).await.unwrap();

    assert!(close(board.aggregate("ok", RELEVANCE_MEASURE).unwrap(), 2.0));
    assert_eq!(board.aggregate("mangled", RELEVANCE_MEASURE), Some(0.0));
}

#[tokio::test]
async fn empty_response_text_is_judged_not_skipped() {
    init_tracing();
    let topics = vec![Topic::new("t1", "first")];
    let responses = vec![RagResponse::empty("r1", "t1")];
    let mock = Arc::new(MockBatchLlm::new("mock-judge").with_text("q0", "0 0 0"));

    let judge = RelevanceJudge::new(mock.clone());
    let board = judge.judge(&responses, &topics).await.unwrap();

    let user = &mock.recorded_batches()[0][0].messages[1].content;
    assert!(user.ends_with("Response: "));
    assert_eq!(board.aggregate("r1", RELEVANCE_MEASURE), Some(0.0));
}

#[test]
fn bad_config_fails_before_any_dispatch() {
    init_tracing();
    let source = LlmConfigSource::Raw(serde_json::json!({ "api_key": "" }));
    let result = RelevanceJudge::from_config(&source);
    assert!(matches!(result, Err(JudgeError::Config(_))));
}
