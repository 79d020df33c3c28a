//! Sentiment scorer trait.
//!
//! Sentiment scoring itself is an external lexicon-based capability; the
//! pipeline only consumes its stable contract and derives the categorical
//! labels from the numeric scores.

use serde::{Deserialize, Serialize};

/// Numeric sentiment for one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Polarity in [-1, 1]; > 0 positive, == 0 neutral, < 0 negative.
    pub polarity: f32,
    /// Subjectivity in [0, 1]; == 0 objective, otherwise subjective.
    pub subjectivity: f32,
}

impl SentimentScore {
    /// A perfectly neutral, objective score. Used for empty texts.
    pub const NEUTRAL: SentimentScore = SentimentScore {
        polarity: 0.0,
        subjectivity: 0.0,
    };
}

/// Trait for sentiment scoring.
///
/// Scoring is total: every string, including the empty string, gets a score.
pub trait SentimentScorer: Send + Sync {
    /// Score one text.
    fn score(&self, text: &str) -> SentimentScore;

    /// Score a batch, in input order.
    fn score_batch(&self, texts: &[String]) -> Vec<SentimentScore> {
        texts.iter().map(|t| self.score(t)).collect()
    }
}
