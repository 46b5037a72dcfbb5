//! Parsing model output into scores and collapsing them into one value.

use std::sync::OnceLock;

use ragjudge_model::BatchOutcome;
use regex::Regex;
use tracing::warn;

/// Exactly three relevance scores in `0..=3`: against the original query,
/// paraphrase 1, and paraphrase 2, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreTriple([u8; 3]);

impl ScoreTriple {
    /// Worst possible score; the fallback for failed or malformed items.
    pub const ZERO: Self = Self([0, 0, 0]);

    /// Build a triple, rejecting values above 3.
    pub fn new(scores: [u8; 3]) -> Option<Self> {
        scores.iter().all(|&s| s <= 3).then_some(Self(scores))
    }

    pub fn scores(&self) -> [u8; 3] {
        self.0
    }

    /// Arithmetic mean of the three scores, in `[0.0, 3.0]`. The original
    /// query and both paraphrases weigh equally.
    pub fn mean(&self) -> f64 {
        self.0.iter().map(|&s| u32::from(s)).sum::<u32>() as f64 / 3.0
    }
}

fn score_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Lone digits only: "30" and "13" are not scores.
    RE.get_or_init(|| Regex::new(r"\b([0-3])\b").expect("score token pattern"))
}

/// Score one batch outcome. A backend failure scores zero without inspecting
/// any text; a successful payload goes through [`parse_relevance_text`].
/// Never fails.
pub fn parse_relevance(outcome: &BatchOutcome) -> ScoreTriple {
    match outcome {
        Ok(response) => parse_relevance_text(&response.text),
        Err(item) => {
            warn!(request_id = %item.request_id, error = %item.error, "item failed, scoring zero");
            ScoreTriple::ZERO
        }
    }
}

/// Extract the first three lone digits in `0..=3` from free-form model
/// output, left to right; anything after them is ignored. Fewer than three
/// qualifying tokens scores zero: an under-specified answer gets no partial
/// credit.
pub fn parse_relevance_text(text: &str) -> ScoreTriple {
    let text = text.trim().to_lowercase();
    let digits: Vec<u8> = score_token()
        .find_iter(&text)
        .take(3)
        .map(|m| m.as_str().as_bytes()[0] - b'0')
        .collect();

    match <[u8; 3]>::try_from(digits) {
        Ok(scores) => ScoreTriple(scores),
        Err(_) => {
            warn!("under-specified relevance answer, scoring zero");
            ScoreTriple::ZERO
        }
    }
}
