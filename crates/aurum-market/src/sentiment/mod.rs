//! Sentiment scoring: two lexical analyzers blended into one score

pub mod pattern;
pub mod scorer;
pub mod stats;
pub mod vader;

pub use pattern::{FormalAnalyzer, PatternAnalyzer, PatternScore};
pub use scorer::{ScoredRecord, SentimentLabel, SentimentResult, SentimentScorer};
pub use stats::{DailySentiment, LabelStat, SentimentSummary, daily_sentiment, summarize};
pub use vader::{SocialAnalyzer, VaderAnalyzer, VaderScores};
