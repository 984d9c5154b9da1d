//! Gold market sentiment and recommendation pipeline
//!
//! This crate turns news and social text plus daily price history into a market
//! report for gold and a small universe of related assets. It includes:
//!
//! - Provider adapters (NewsAPI, Alpha Vantage) and a normalizer into one record schema
//! - Blended sentiment scoring (VADER for social text, a pattern lexicon for news)
//! - Descriptive statistics and daily sentiment aggregation
//! - Sentiment/price and cross-asset Pearson correlation with p-values
//! - A global debt macro signal for safe-haven assets
//! - Rule-based asset recommendations, investor profile and confidence
//! - A linear next-price estimate for the reference asset
//!
//! # Architecture
//!
//! [`MarketPipeline`] is a pure function of a [`MarketSnapshot`]: the same snapshot
//! always yields the same [`MarketReport`]. [`LiveRunner`] wraps provider adapters
//! in TTL caches and merges their output into a snapshot before each run.
//!
//! # Example
//!
//! ```rust,ignore
//! use aurum_market::{MarketConfig, MarketPipeline, MarketSnapshot};
//!
//! fn main() -> aurum_market::Result<()> {
//!     let config = MarketConfig::default();
//!     let pipeline = MarketPipeline::new(&config)?;
//!
//!     let snapshot = MarketSnapshot::from_json_file("snapshot.json")?;
//!     let report = pipeline.run(snapshot);
//!
//!     for rec in &report.recommendations {
//!         println!("{} {} {:.0}", rec.asset_name, rec.action, rec.score);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod sentiment;

// Re-export main types for convenience
pub use config::MarketConfig;
pub use engine::{
    AssetProfile, AssetUniverse, HavenTier, LiveRunner, MarketPipeline, MarketReport,
    MarketSnapshot, ScoringWeights,
};
pub use error::{MarketError, Result};

pub use analysis::{Action, InvestorProfile, Recommendation, RiskLevel};
pub use ingest::{AdapterOutput, RawRecord, SourceAdapter, TextRecord};
pub use sentiment::{ScoredRecord, SentimentLabel, SentimentScorer};
