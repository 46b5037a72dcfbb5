//! Leaderboard accumulation.
//!
//! A judge contributes one `(run, topic, measure values)` cell at a time;
//! `build` collapses the cells into one aggregate per run and measure.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::error::{JudgeError, Result};

/// One scalar measure tracked by a leaderboard.
#[derive(Debug, Clone)]
pub struct MeasureSpec {
    pub name: String,
}

impl MeasureSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The set of measures a leaderboard aggregates. The first measure is the
/// primary one and drives the final ranking order.
#[derive(Debug, Clone)]
pub struct LeaderboardSpec {
    pub measures: Vec<MeasureSpec>,
}

impl LeaderboardSpec {
    pub fn new(measures: Vec<MeasureSpec>) -> Self {
        Self { measures }
    }

    /// Spec with a single measure.
    pub fn single(name: impl Into<String>) -> Self {
        Self::new(vec![MeasureSpec::new(name)])
    }

    fn primary_measure(&self) -> Option<&str> {
        self.measures.first().map(|m| m.name.as_str())
    }
}

/// Policy for runs that lack scores for some expected topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMissing {
    /// Aggregate over only the topics the run has scores for. A run scored
    /// on one of two expected topics gets that topic's value as its
    /// aggregate, not half of it.
    FixAggregate,
    /// Incomplete topic coverage fails the build.
    Error,
}

/// Accumulates per-(run, topic) measure values.
///
/// Duplicate `(run, topic)` contributions overwrite; the last write wins.
pub struct LeaderboardBuilder {
    spec: LeaderboardSpec,
    cells: BTreeMap<String, BTreeMap<String, HashMap<String, f64>>>,
}

impl LeaderboardBuilder {
    pub fn new(spec: LeaderboardSpec) -> Self {
        Self { spec, cells: BTreeMap::new() }
    }

    /// Record measure values for one run on one topic.
    pub fn add(&mut self, run_id: &str, topic_id: &str, values: HashMap<String, f64>) {
        self.cells
            .entry(run_id.to_string())
            .or_default()
            .insert(topic_id.to_string(), values);
    }

    /// Collapse accumulated cells into per-run aggregates over the expected
    /// topics. Scores for topics outside `expected_topic_ids` are ignored.
    pub fn build(self, expected_topic_ids: &[String], on_missing: OnMissing) -> Result<Leaderboard> {
        let expected: BTreeSet<&str> = expected_topic_ids.iter().map(String::as_str).collect();

        let mut entries = Vec::with_capacity(self.cells.len());
        for (run_id, topics) in &self.cells {
            let scored: Vec<(&str, &HashMap<String, f64>)> = topics
                .iter()
                .filter(|(topic_id, _)| expected.contains(topic_id.as_str()))
                .map(|(topic_id, values)| (topic_id.as_str(), values))
                .collect();

            if on_missing == OnMissing::Error && scored.len() != expected.len() {
                return Err(JudgeError::Leaderboard(format!(
                    "run '{}' scored {} of {} expected topics",
                    run_id,
                    scored.len(),
                    expected.len()
                )));
            }

            let mut aggregates = BTreeMap::new();
            for measure in &self.spec.measures {
                let values: Vec<f64> =
                    scored.iter().filter_map(|(_, cell)| cell.get(&measure.name).copied()).collect();
                let mean = if values.is_empty() {
                    0.0
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                };
                aggregates.insert(measure.name.clone(), mean);
            }

            entries.push(LeaderboardEntry {
                run_id: run_id.clone(),
                aggregates,
                topics_scored: scored.len(),
            });
        }

        if let Some(primary) = self.spec.primary_measure() {
            entries.sort_by(|a, b| {
                let a_score = a.aggregates.get(primary).copied().unwrap_or(0.0);
                let b_score = b.aggregates.get(primary).copied().unwrap_or(0.0);
                b_score.total_cmp(&a_score).then_with(|| a.run_id.cmp(&b.run_id))
            });
        }

        Ok(Leaderboard { entries })
    }
}

/// Final per-run aggregates, ranked by the primary measure (descending,
/// ties broken by run id).
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub run_id: String,
    pub aggregates: BTreeMap<String, f64>,
    /// Number of expected topics this run had scores for.
    pub topics_scored: usize,
}

impl Leaderboard {
    pub fn entry(&self, run_id: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.run_id == run_id)
    }

    pub fn aggregate(&self, run_id: &str, measure: &str) -> Option<f64> {
        self.entry(run_id).and_then(|e| e.aggregates.get(measure).copied())
    }
}
