//! Stub sentiment scorer for testing.
//!
//! A tiny fixed lexicon, nothing more. The real scorer is an external
//! lexicon-based service; this stub only has to honor the contract
//! (polarity in [-1, 1], subjectivity in [0, 1], total over all strings).

use crate::traits::{SentimentScore, SentimentScorer};

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "love", "helpful", "easy", "fast", "friendly",
];
const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "terrible", "hate", "slow", "confusing", "broken", "rude",
];

/// Word-count lexicon scorer.
///
/// Polarity is the normalized difference of positive and negative word hits;
/// subjectivity is the fraction of words that hit the lexicon at all.
#[derive(Debug, Default, Clone)]
pub struct StubSentimentScorer;

impl StubSentimentScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for StubSentimentScorer {
    fn score(&self, text: &str) -> SentimentScore {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        if words.is_empty() {
            return SentimentScore::NEUTRAL;
        }

        let positive = words
            .iter()
            .filter(|w| POSITIVE_WORDS.contains(&w.as_str()))
            .count() as f32;
        let negative = words
            .iter()
            .filter(|w| NEGATIVE_WORDS.contains(&w.as_str()))
            .count() as f32;
        let hits = positive + negative;

        let polarity = if hits > 0.0 {
            (positive - negative) / hits
        } else {
            0.0
        };
        let subjectivity = hits / words.len() as f32;

        SentimentScore {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text_scores_positive() {
        let scorer = StubSentimentScorer::new();
        let score = scorer.score("great helpful service");
        assert!(score.polarity > 0.0);
        assert!(score.subjectivity > 0.0);
    }

    #[test]
    fn test_negative_text_scores_negative() {
        let scorer = StubSentimentScorer::new();
        let score = scorer.score("terrible slow rude staff");
        assert!(score.polarity < 0.0);
    }

    #[test]
    fn test_neutral_text_scores_zero() {
        let scorer = StubSentimentScorer::new();
        let score = scorer.score("the building is on main street");
        assert_eq!(score.polarity, 0.0);
        assert_eq!(score.subjectivity, 0.0);
    }

    #[test]
    fn test_empty_text_is_neutral_objective() {
        let scorer = StubSentimentScorer::new();
        assert_eq!(scorer.score(""), SentimentScore::NEUTRAL);
    }
}
