//! Market analysis: signals, correlation, macro, recommendations and forecast

pub mod correlation;
pub mod forecast;
pub mod macro_signal;
pub mod prices;
pub mod recommend;
pub mod signals;

pub use correlation::{
    AssetCorrelation, CorrelationResult, CorrelationStrength, SentimentSample, correlate,
    cross_asset_correlations, pearson,
};
pub use forecast::{ForecastDriver, ForecastDrivers, PriceForecast, predict};
pub use macro_signal::{DebtObservation, DebtRiskLevel, DebtSnapshot, GLOBAL_DEBT_HISTORY, MacroSignal};
pub use prices::{PricePoint, PriceSeries};
pub use recommend::{
    Action, InvestorProfile, MarketAssessment, MarketContext, Recommendation, RecommendationScorer,
    RiskLevel, confidence,
};
pub use signals::AssetSignal;
