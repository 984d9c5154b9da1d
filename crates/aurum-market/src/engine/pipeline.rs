//! One refresh of the full pipeline over a snapshot of inputs

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::{
    AssetCorrelation, AssetSignal, CorrelationResult, DebtSnapshot, ForecastDrivers, MacroSignal,
    MarketAssessment, PriceForecast, PriceSeries, Recommendation, RecommendationScorer,
    SentimentSample, correlate, cross_asset_correlations, predict,
};
use crate::config::MarketConfig;
use crate::engine::universe::AssetUniverse;
use crate::engine::weights::ScoringWeights;
use crate::error::Result;
use crate::ingest::{AdapterOutput, normalize_at};
use crate::sentiment::{
    DailySentiment, ScoredRecord, SentimentScorer, SentimentSummary, daily_sentiment, summarize,
};

/// Everything one refresh consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Ingestion time for records without a usable timestamp; defaults to now
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    /// Adapter outputs in configured adapter order
    #[serde(default)]
    pub sources: Vec<AdapterOutput>,
    #[serde(default)]
    pub prices: Vec<PriceSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt: Option<DebtSnapshot>,
}

impl MarketSnapshot {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn series(&self, asset: &str) -> Option<&PriceSeries> {
        self.prices.iter().find(|s| s.asset == asset)
    }
}

/// Everything one refresh produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketReport {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<ScoredRecord>,
    pub summary: SentimentSummary,
    pub daily_sentiment: Vec<DailySentiment>,
    /// Daily mean sentiment against reference closes
    pub sentiment_correlation: CorrelationResult,
    pub cross_asset: Vec<AssetCorrelation>,
    pub recommendations: Vec<Recommendation>,
    pub assessment: MarketAssessment,
    pub debt: Option<DebtSnapshot>,
    pub macro_signal: Option<MacroSignal>,
    pub forecast: Option<PriceForecast>,
    /// Assets left out for invalid or too short price history
    pub skipped_assets: Vec<String>,
}

/// The scoring pipeline; holds no state between runs
pub struct MarketPipeline {
    scorer: SentimentScorer,
    recommender: RecommendationScorer,
    weights: ScoringWeights,
    forecast: ForecastDrivers,
}

impl MarketPipeline {
    pub fn new(config: &MarketConfig) -> Result<Self> {
        config.validate()?;

        let scorer = SentimentScorer::new()?.with_weights(config.weights.blend, config.weights.labels);

        Ok(Self {
            scorer,
            recommender: RecommendationScorer::new(config.weights, config.universe.clone()),
            weights: config.weights,
            forecast: config.forecast.clone(),
        })
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    pub fn universe(&self) -> &AssetUniverse {
        self.recommender.universe()
    }

    /// Normalize, score, aggregate, correlate, rank and forecast
    pub fn run(&self, snapshot: MarketSnapshot) -> MarketReport {
        let generated_at = snapshot.generated_at.unwrap_or_else(Utc::now);
        let MarketSnapshot {
            sources,
            prices,
            debt,
            ..
        } = snapshot;

        let records = normalize_at(sources, generated_at);
        let scored = self.scorer.score_collection(records);
        let summary = summarize(&scored);
        let daily = daily_sentiment(&scored);

        let mut skipped_assets = Vec::new();
        let prices: Vec<PriceSeries> = prices
            .into_iter()
            .filter(|series| match series.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(asset = %series.asset, error = %e, "Dropping invalid price series");
                    skipped_assets.push(series.asset.clone());
                    false
                }
            })
            .collect();

        let reference = prices.iter().find(|s| self.universe().is_reference(&s.asset));
        if reference.is_none() {
            warn!(reference = %self.universe().reference, "No price series for the reference asset");
        }

        let sentiment_correlation = reference.map_or(CorrelationResult::undefined(0), |series| {
            correlate(&SentimentSample::from_daily(&daily), series)
        });
        let cross_asset = reference
            .map(|series| cross_asset_correlations(series, &prices))
            .unwrap_or_default();

        let mut signals = Vec::with_capacity(prices.len());
        for series in &prices {
            match AssetSignal::from_series(series) {
                Some(signal) => signals.push(signal),
                None => {
                    warn!(asset = %series.asset, bars = series.len(), "Not enough history, skipping asset");
                    skipped_assets.push(series.asset.clone());
                }
            }
        }

        let macro_signal = debt.map(|d| MacroSignal::evaluate(&d, &self.weights.macro_signal));
        let aggregate_sentiment = summary.mean;

        let recommendations =
            self.recommender
                .rank_assets(&signals, aggregate_sentiment, &scored, macro_signal.as_ref());
        let assessment = self
            .recommender
            .assess(&signals, aggregate_sentiment, scored.len());

        let forecast = reference.and_then(|series| {
            predict(
                series,
                &prices,
                aggregate_sentiment,
                macro_signal.as_ref().map_or(0.0, |m| m.price_impact),
                &self.forecast,
            )
        });

        info!(
            records = scored.len(),
            assets = recommendations.len(),
            skipped = skipped_assets.len(),
            mean_sentiment = aggregate_sentiment,
            profile = %assessment.profile,
            "Pipeline run complete"
        );

        MarketReport {
            generated_at,
            records: scored,
            summary,
            daily_sentiment: daily,
            sentiment_correlation,
            cross_asset,
            recommendations,
            assessment,
            debt,
            macro_signal,
            forecast,
            skipped_assets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::prices::tests::{day, series};
    use crate::analysis::{Action, PricePoint};
    use crate::ingest::raw::{NewsApiArticle, NewsApiSource, RawRecord};
    use chrono::TimeZone;

    fn article(title: &str, day: u32) -> RawRecord {
        RawRecord::NewsApi(NewsApiArticle {
            source: NewsApiSource {
                id: None,
                name: Some("Reuters".to_string()),
            },
            title: Some(title.to_string()),
            published_at: Some(format!("2025-01-{day:02}T12:00:00Z")),
            ..Default::default()
        })
    }

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot {
            generated_at: Some(Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap()),
            sources: vec![
                AdapterOutput::new(
                    "newsapi",
                    vec![
                        article("Gold prices surge to a great record high", 2),
                        article("Investors are happy as gold rallies", 3),
                        article("Gold demand remains strong and healthy", 5),
                    ],
                ),
                AdapterOutput::new("alpha_vantage", vec![article("Investors are happy as gold rallies", 4)]),
            ],
            prices: vec![
                series("GOLD (GC=F)", &[100.0, 100.5, 101.0, 101.5, 102.0, 104.0, 106.0]),
                series("NASDAQ", &[200.0, 199.0, 198.0, 197.0, 196.0, 195.0, 194.0]),
                series("BITCOIN", &[1.0, 2.0, 3.0]),
            ],
            debt: DebtSnapshot::latest(),
        }
    }

    fn pipeline() -> MarketPipeline {
        tokio_test::assert_ok!(MarketPipeline::new(&MarketConfig::default()))
    }

    #[test]
    fn test_empty_snapshot() {
        let report = pipeline().run(MarketSnapshot::default());
        assert!(report.records.is_empty());
        assert_eq!(report.summary.total, 0);
        assert!(!report.sentiment_correlation.is_defined());
        assert!(report.recommendations.is_empty());
        assert!(report.forecast.is_none());
        assert!(report.macro_signal.is_none());
    }

    #[test]
    fn test_full_run() {
        let report = pipeline().run(snapshot());

        // the duplicate headline from the second adapter is dropped
        assert_eq!(report.records.len(), 3);
        assert!(report.records.windows(2).all(|w| w[0].record.timestamp >= w[1].record.timestamp));

        assert!(report.summary.mean > 0.0);
        assert_eq!(report.skipped_assets, vec!["BITCOIN".to_string()]);
        assert_eq!(report.recommendations.len(), 2);
        assert_eq!(report.cross_asset.len(), 2);

        let gold = report
            .recommendations
            .iter()
            .find(|r| r.asset_name == "GOLD (GC=F)")
            .unwrap();
        assert_eq!(gold.action, Action::StrongBuy);
        assert!(report.recommendations[0].score >= report.recommendations[1].score);

        let forecast = report.forecast.as_ref().unwrap();
        assert_eq!(forecast.latest_price, 106.0);
        assert!(report.macro_signal.as_ref().unwrap().score > 0.0);
        assert_eq!(report.sentiment_correlation.sample_size, 3);
    }

    #[test]
    fn test_run_is_deterministic() {
        let p = pipeline();
        let a = p.run(snapshot());
        let b = p.run(snapshot());
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_series_is_skipped() {
        let mut snap = snapshot();
        snap.prices.push(PriceSeries {
            asset: "SILVER (SI=F)".to_string(),
            points: vec![
                PricePoint::new(day(1), 30.0),
                PricePoint::new(day(0), 31.0),
            ],
        });

        let report = pipeline().run(snap);
        assert!(report.skipped_assets.contains(&"SILVER (SI=F)".to_string()));
        assert!(report.recommendations.iter().all(|r| r.asset_name != "SILVER (SI=F)"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = MarketConfig::default();
        config.universe.reference = "PLATINUM".to_string();
        assert!(MarketPipeline::new(&config).is_err());
    }

    #[test]
    fn test_snapshot_json() {
        let json = r#"{
            "sources": [{"source": "tweets", "records": [
                {"provider": "twitter", "text": "Gold is looking great today!", "created_at": "2025-01-02T08:00:00Z"}
            ]}],
            "prices": [{"asset": "GOLD (GC=F)", "points": [{"date": "2025-01-02", "close": 2650.5}]}]
        }"#;
        let snap: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.sources.len(), 1);
        assert_eq!(snap.series("GOLD (GC=F)").map(PriceSeries::len), Some(1));
        assert!(snap.debt.is_none());
    }
}
