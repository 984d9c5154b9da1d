//! Aggregate statistics over scored records

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

use super::scorer::{ScoredRecord, SentimentLabel};

/// Count of one label and its share of the total
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelStat {
    pub count: usize,
    /// Percent of all records; absent for an empty collection
    pub percentage: Option<f64>,
}

/// Summary of a scored collection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; 0 for fewer than two records
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub positive: LabelStat,
    pub neutral: LabelStat,
    pub negative: LabelStat,
}

impl SentimentSummary {
    pub fn label(&self, label: SentimentLabel) -> LabelStat {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }
}

/// Summarize scores and label counts; an empty slice gives the zeroed summary
pub fn summarize(scored: &[ScoredRecord]) -> SentimentSummary {
    if scored.is_empty() {
        return SentimentSummary::default();
    }

    let scores: Vec<f64> = scored.iter().map(|r| r.sentiment_score).collect();
    let total = scores.len();

    let std_dev = if total > 1 {
        scores.iter().std_dev()
    } else {
        0.0
    };

    let mut data = Data::new(scores.clone());
    let median = OrderStatistics::median(&mut data);

    let label_stat = |label: SentimentLabel| {
        let count = scored.iter().filter(|r| r.sentiment_label == label).count();
        LabelStat {
            count,
            percentage: Some(count as f64 / total as f64 * 100.0),
        }
    };

    SentimentSummary {
        total,
        mean: scores.iter().mean(),
        median,
        std_dev,
        min: Statistics::min(scores.iter()),
        max: Statistics::max(scores.iter()),
        positive: label_stat(SentimentLabel::Positive),
        neutral: label_stat(SentimentLabel::Neutral),
        negative: label_stat(SentimentLabel::Negative),
    }
}

/// Mean sentiment of one UTC calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub mean_score: f64,
    pub count: usize,
}

/// Mean score per UTC day, ascending by date
pub fn daily_sentiment(scored: &[ScoredRecord]) -> Vec<DailySentiment> {
    let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in scored {
        let entry = by_day
            .entry(record.record.timestamp.date_naive())
            .or_insert((0.0, 0));
        entry.0 += record.sentiment_score;
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(date, (sum, count))| DailySentiment {
            date,
            mean_score: sum / count as f64,
            count,
        })
        .collect()
}
