//! # ragjudge-core
//!
//! Core types for the ragjudge relevance judge: topics and run responses,
//! the shared error taxonomy, and the leaderboard accumulation used to turn
//! per-(run, topic) scores into a ranked artifact.

pub mod error;
pub mod leaderboard;
pub mod types;

pub use error::{JudgeError, Result};
pub use leaderboard::{
    Leaderboard, LeaderboardBuilder, LeaderboardEntry, LeaderboardSpec, MeasureSpec, OnMissing,
};
pub use types::{RagResponse, Topic};
