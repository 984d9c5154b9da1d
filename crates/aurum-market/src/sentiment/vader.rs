//! Social-text analyzer backed by VADER

use serde::{Deserialize, Serialize};
use vader_sentiment::SentimentIntensityAnalyzer;

/// VADER output: compound score and the pos/neu/neg proportions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VaderScores {
    /// Normalized compound score in [-1, 1]
    pub compound: f64,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl Default for VaderScores {
    /// Fully neutral text
    fn default() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            neutral: 1.0,
            negative: 0.0,
        }
    }
}

/// Analyzer tuned for short, informal text (headlines, tweets)
#[cfg_attr(test, mockall::automock)]
pub trait SocialAnalyzer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> VaderScores;
}

/// VADER with its stock lexicon: negation, intensifiers, caps emphasis,
/// punctuation and emoji cues
pub struct VaderAnalyzer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderAnalyzer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VaderAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaderAnalyzer").finish_non_exhaustive()
    }
}

impl SocialAnalyzer for VaderAnalyzer {
    fn polarity_scores(&self, text: &str) -> VaderScores {
        let scores = self.analyzer.polarity_scores(text);
        let get = |key: &str| scores.get(key).copied().unwrap_or_default();

        VaderScores {
            compound: get("compound"),
            positive: get("pos"),
            neutral: get("neu"),
            negative: get("neg"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_and_negative_headlines() {
        let vader = VaderAnalyzer::new();

        let good = vader.polarity_scores("Gold investors are very happy with the great rally!");
        assert!(good.compound > 0.3, "got {}", good.compound);
        assert!(good.positive > good.negative);

        let bad = vader.polarity_scores("Terrible week, horrible losses and panic everywhere");
        assert!(bad.compound < -0.3, "got {}", bad.compound);
        assert!(bad.negative > bad.positive);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let vader = VaderAnalyzer::new();
        let plain = vader.polarity_scores("The outlook is good");
        let negated = vader.polarity_scores("The outlook is not good");
        assert!(plain.compound > 0.0);
        assert!(negated.compound < plain.compound);
    }

    #[test]
    fn test_proportions_sum_to_one() {
        let vader = VaderAnalyzer::new();
        let s = vader.polarity_scores("Gold closed slightly higher on Tuesday, a good sign");
        assert!((s.positive + s.neutral + s.negative - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_default_is_neutral() {
        let s = VaderScores::default();
        assert_eq!(s.compound, 0.0);
        assert_eq!(s.neutral, 1.0);
    }
}
