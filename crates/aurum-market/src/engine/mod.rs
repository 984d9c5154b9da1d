//! Scoring tables, the asset universe and the refresh pipeline

pub mod pipeline;
pub mod runner;
pub mod universe;
pub mod weights;

pub use pipeline::{MarketPipeline, MarketReport, MarketSnapshot};
pub use runner::{CachedAdapter, LiveRunner};
pub use universe::{AssetProfile, AssetUniverse, HavenTier};
pub use weights::{
    ActionBands, BlendWeights, LabelBand, MacroWeights, ProfileWeights, RuleWeights,
    ScoringWeights,
};
