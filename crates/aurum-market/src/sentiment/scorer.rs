//! Blended sentiment scoring of text records

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::weights::{BlendWeights, LabelBand};
use crate::error::Result;
use crate::ingest::TextRecord;

use super::pattern::{FormalAnalyzer, PatternAnalyzer, PatternScore};
use super::vader::{SocialAnalyzer, VaderAnalyzer, VaderScores};

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Label for a blended score; NaN is neutral
    pub fn from_score(score: f64, band: &LabelBand) -> Self {
        if score >= band.positive {
            Self::Positive
        } else if score <= band.negative {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        };
        write!(f, "{label}")
    }
}

/// Score, label and the sub-scores they came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    pub label: SentimentLabel,
    pub social: VaderScores,
    pub formal: PatternScore,
}

impl SentimentResult {
    /// The result for text too short to score
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            social: VaderScores::default(),
            formal: PatternScore::default(),
        }
    }
}

/// A text record with its sentiment attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: TextRecord,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    /// Social-text analyzer sub-scores
    pub lexicon_a: VaderScores,
    /// Formal-text analyzer sub-scores
    pub lexicon_b: PatternScore,
}

impl ScoredRecord {
    pub fn new(record: TextRecord, result: SentimentResult) -> Self {
        Self {
            record,
            sentiment_score: result.score,
            sentiment_label: result.label,
            lexicon_a: result.social,
            lexicon_b: result.formal,
        }
    }
}

/// Blends a social-text and a formal-text analyzer into one score
///
/// Scoring holds no mutable state, so one scorer can be shared freely.
pub struct SentimentScorer<S = VaderAnalyzer, F = PatternAnalyzer> {
    social: S,
    formal: F,
    blend: BlendWeights,
    labels: LabelBand,
}

impl SentimentScorer {
    /// Scorer with the VADER and pattern-lexicon analyzers
    pub fn new() -> Result<Self> {
        Ok(Self::with_analyzers(VaderAnalyzer::new(), PatternAnalyzer::new()?))
    }
}

impl<S: SocialAnalyzer, F: FormalAnalyzer> SentimentScorer<S, F> {
    pub fn with_analyzers(social: S, formal: F) -> Self {
        Self {
            social,
            formal,
            blend: BlendWeights::default(),
            labels: LabelBand::default(),
        }
    }

    pub fn with_weights(mut self, blend: BlendWeights, labels: LabelBand) -> Self {
        self.blend = blend;
        self.labels = labels;
        self
    }

    pub fn labels(&self) -> &LabelBand {
        &self.labels
    }

    /// Score one text
    pub fn score(&self, text: &str) -> SentimentResult {
        // trimming only gates length; analyzers see the text as given
        if text.trim().chars().count() < self.labels.min_text_chars {
            return SentimentResult::neutral();
        }

        let social = self.social.polarity_scores(text);
        let formal = self.formal.analyze(text).unwrap_or_else(|e| {
            debug!(error = %e, "Formal analyzer failed, using neutral sub-score");
            PatternScore::default()
        });

        let score = self
            .blend
            .blend(social.compound, formal.polarity)
            .clamp(-1.0, 1.0);

        SentimentResult {
            score,
            label: SentimentLabel::from_score(score, &self.labels),
            social,
            formal,
        }
    }

    pub fn score_record(&self, record: TextRecord) -> ScoredRecord {
        let result = self.score(&record.combined_text);
        ScoredRecord::new(record, result)
    }

    /// Score every record independently, logging progress every 10 records
    pub fn score_collection(&self, records: Vec<TextRecord>) -> Vec<ScoredRecord> {
        let total = records.len();
        let mut scored = Vec::with_capacity(total);

        for (i, record) in records.into_iter().enumerate() {
            scored.push(self.score_record(record));
            if (i + 1) % 10 == 0 {
                info!(processed = i + 1, total, "Scoring sentiment");
            }
        }

        if total > 0 {
            let count = |label: SentimentLabel| scored.iter().filter(|r| r.sentiment_label == label).count();
            let mean = scored.iter().map(|r| r.sentiment_score).sum::<f64>() / total as f64;
            info!(
                total,
                positive = count(SentimentLabel::Positive),
                neutral = count(SentimentLabel::Neutral),
                negative = count(SentimentLabel::Negative),
                mean,
                "Sentiment scoring complete"
            );
        }

        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use crate::sentiment::pattern::MockFormalAnalyzer;
    use crate::sentiment::vader::MockSocialAnalyzer;
    use chrono::Utc;

    fn mock_scorer(compound: f64, polarity: Option<f64>) -> SentimentScorer<MockSocialAnalyzer, MockFormalAnalyzer> {
        let mut social = MockSocialAnalyzer::new();
        social.expect_polarity_scores().returning(move |_| VaderScores {
            compound,
            positive: 0.0,
            neutral: 1.0,
            negative: 0.0,
        });

        let mut formal = MockFormalAnalyzer::new();
        formal.expect_analyze().returning(move |_| match polarity {
            Some(polarity) => Ok(PatternScore {
                polarity,
                subjectivity: 0.5,
            }),
            None => Err(MarketError::AnalyzerError("malformed".to_string())),
        });

        SentimentScorer::with_analyzers(social, formal)
    }

    #[test]
    fn test_short_text_is_neutral() {
        let scorer = mock_scorer(0.9, Some(0.9));
        for text in ["", "  ", "ok", " a ", "ñú"] {
            let result = scorer.score(text);
            assert_eq!(result, SentimentResult::neutral(), "text {text:?}");
        }
        let neutral = SentimentResult::neutral();
        assert_eq!(neutral.social.neutral, 1.0);
        assert_eq!(neutral.social.compound, 0.0);
        assert_eq!(neutral.formal.polarity, 0.0);
        assert_eq!(neutral.formal.subjectivity, 0.0);
    }

    #[test]
    fn test_blend_of_sub_scores() {
        let scorer = mock_scorer(0.8, Some(0.2));
        let result = scorer.score("Gold rallies");
        assert!((result.score - 0.56).abs() < 1e-12);
        assert_eq!(result.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_formal_failure_defaults_to_zero() {
        let scorer = mock_scorer(0.5, None);
        let result = scorer.score("Gold \u{0000} rallies");
        assert!((result.score - 0.3).abs() < 1e-12);
        assert_eq!(result.formal, PatternScore::default());
    }

    #[test]
    fn test_analyzers_receive_untrimmed_text() {
        let mut social = MockSocialAnalyzer::new();
        social
            .expect_polarity_scores()
            .withf(|text| text == "  Gold rallies!  ")
            .times(1)
            .returning(|_| VaderScores {
                compound: 0.5,
                positive: 0.5,
                neutral: 0.5,
                negative: 0.0,
            });

        let mut formal = MockFormalAnalyzer::new();
        formal
            .expect_analyze()
            .withf(|text| text == "  Gold rallies!  ")
            .times(1)
            .returning(|_| Ok(PatternScore::default()));

        let scorer = SentimentScorer::with_analyzers(social, formal);
        let result = scorer.score("  Gold rallies!  ");
        assert!((result.score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_label_thresholds() {
        let band = LabelBand::default();
        assert_eq!(SentimentLabel::from_score(0.05, &band), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(0.049_999, &band), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.0, &band), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.049_999, &band), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.05, &band), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(1.0, &band), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(-1.0, &band), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(f64::NAN, &band), SentimentLabel::Neutral);
    }

    #[test]
    fn test_labels_partition_the_range() {
        let band = LabelBand::default();
        for i in -100..=100 {
            let score = f64::from(i) / 100.0;
            let label = SentimentLabel::from_score(score, &band);
            let expected = if score >= 0.05 {
                SentimentLabel::Positive
            } else if score <= -0.05 {
                SentimentLabel::Negative
            } else {
                SentimentLabel::Neutral
            };
            assert_eq!(label, expected, "score {score}");
        }
    }

    #[test]
    fn test_score_collection_keeps_order() {
        let scorer = SentimentScorer::new().unwrap();
        let records = vec![
            TextRecord::new(Utc::now(), "Gold prices surge to a great record high", "", "A"),
            TextRecord::new(Utc::now(), "ok", "", "B"),
            TextRecord::new(Utc::now(), "Terrible crash, horrible losses for investors", "", "C"),
        ];

        let scored = scorer.score_collection(records);
        assert_eq!(scored.len(), 3);
        assert_eq!(scored[0].record.source_name, "A");
        assert_eq!(scored[0].sentiment_label, SentimentLabel::Positive);
        assert_eq!(scored[1].sentiment_score, 0.0);
        assert_eq!(scored[1].sentiment_label, SentimentLabel::Neutral);
        assert_eq!(scored[2].sentiment_label, SentimentLabel::Negative);
    }

    #[test]
    fn test_scores_are_bounded() {
        let scorer = SentimentScorer::new().unwrap();
        for text in [
            "BEST DAY EVER!!! Gold is AMAZING 🚀🚀🚀",
            "WORST crash ever, absolutely horrible and terrible!!!",
            "Gold was unchanged at 2,000 dollars.",
        ] {
            let result = scorer.score(text);
            assert!((-1.0..=1.0).contains(&result.score), "{text}: {}", result.score);
            assert_eq!(result.label, SentimentLabel::from_score(result.score, scorer.labels()));
        }
    }
}
