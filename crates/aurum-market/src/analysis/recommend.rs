//! Rule-based buy/hold/sell scoring per asset
//!
//! Each asset starts at zero and the rules below add or subtract points in a
//! fixed order. The volatility penalty depends on the running score, so the order
//! is part of the contract.
//!
//! 1. Trend (5-day change)
//! 2. Aggregate news sentiment
//! 3. Volatility penalty or stability bonus
//! 4. Rotation away from the reference asset
//! 5. Asset-specific news
//! 6. Macro debt signal, weighted by haven tier

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::macro_signal::MacroSignal;
use super::signals::AssetSignal;
use crate::engine::universe::{AssetUniverse, HavenTier};
use crate::engine::weights::{ActionBands, ProfileWeights, ScoringWeights};
use crate::sentiment::ScoredRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    StrongBuy,
    ConsiderBuy,
    Hold,
    ConsiderSell,
    StrongSell,
}

impl Action {
    /// Map a score onto the action bands, top-down
    pub fn from_score(score: f64, bands: &ActionBands) -> Self {
        if score > bands.strong_buy {
            Self::StrongBuy
        } else if score > bands.consider_buy {
            Self::ConsiderBuy
        } else if score >= bands.hold {
            Self::Hold
        } else if score >= bands.consider_sell {
            Self::ConsiderSell
        } else {
            Self::StrongSell
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::ConsiderBuy => "CONSIDER_BUY",
            Self::Hold => "HOLD",
            Self::ConsiderSell => "CONSIDER_SELL",
            Self::StrongSell => "STRONG_SELL",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// High above the volatility limit, otherwise low for HOLD and moderate for the rest
    pub fn assess(volatility: f64, action: Action, bands: &ActionBands) -> Self {
        if volatility > bands.high_risk_volatility {
            Self::High
        } else if action == Action::Hold {
            Self::Low
        } else {
            Self::Moderate
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub asset_name: String,
    pub score: f64,
    pub action: Action,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
    pub latest_price: f64,
    pub pct_change_5d: f64,
    pub pct_change_20d: Option<f64>,
    pub volatility: f64,
}

/// Market-wide inputs shared by every asset in one ranking
#[derive(Debug, Clone, Copy)]
pub struct MarketContext<'a> {
    /// Mean sentiment over all scored records
    pub aggregate_sentiment: f64,
    pub news: &'a [ScoredRecord],
    pub macro_signal: Option<&'a MacroSignal>,
    /// 5-day change of the reference asset, when it has a signal
    pub reference_change_5d: Option<f64>,
}

pub struct RecommendationScorer {
    weights: ScoringWeights,
    universe: AssetUniverse,
}

impl RecommendationScorer {
    pub fn new(weights: ScoringWeights, universe: AssetUniverse) -> Self {
        Self { weights, universe }
    }

    pub fn universe(&self) -> &AssetUniverse {
        &self.universe
    }

    /// Apply every rule to one asset
    pub fn score_asset(&self, signal: &AssetSignal, ctx: &MarketContext<'_>) -> Recommendation {
        let rules = &self.weights.rules;
        let mut score = 0.0;
        let mut reasons = Vec::new();

        if signal.pct_change_5d > rules.trend_threshold {
            score += rules.trend_delta;
            reasons.push(format!("Uptrend +{:.1}% over 5 days", signal.pct_change_5d));
        } else if signal.pct_change_5d < -rules.trend_threshold {
            score -= rules.trend_delta;
            reasons.push(format!("Downtrend {:.1}% over 5 days", signal.pct_change_5d));
        }

        if ctx.aggregate_sentiment > rules.sentiment_threshold {
            score += rules.sentiment_delta;
            reasons.push(format!(
                "Positive market sentiment ({:.2})",
                ctx.aggregate_sentiment
            ));
        } else if ctx.aggregate_sentiment < -rules.sentiment_threshold {
            score -= rules.sentiment_delta;
            reasons.push(format!(
                "Negative market sentiment ({:.2})",
                ctx.aggregate_sentiment
            ));
        }

        if signal.volatility > rules.high_volatility {
            if score > 0.0 {
                score -= rules.high_volatility_penalty;
            }
            reasons.push(format!("High volatility {:.1}%, higher risk", signal.volatility));
        } else if signal.volatility < rules.low_volatility {
            score += rules.low_volatility_bonus;
            reasons.push(format!("Low volatility {:.1}%, lower risk", signal.volatility));
        }

        if !self.universe.is_reference(&signal.name)
            && ctx
                .reference_change_5d
                .is_some_and(|change| change > rules.reference_rally)
            && signal.pct_change_5d < rules.divergence_threshold
        {
            score += rules.diversification_bonus;
            reasons.push(format!(
                "Diversification opportunity against {}",
                self.universe.reference
            ));
        }

        let keyword = self.universe.keyword(&signal.name);
        let matched: Vec<f64> = ctx
            .news
            .iter()
            .filter(|r| r.record.mentions(&keyword))
            .map(|r| r.sentiment_score)
            .collect();
        if !matched.is_empty() {
            let mean = matched.iter().sum::<f64>() / matched.len() as f64;
            if mean > rules.news_threshold {
                score += rules.news_delta;
                reasons.push(format!(
                    "Very positive news about {} ({} articles)",
                    signal.name,
                    matched.len()
                ));
            } else if mean < -rules.news_threshold {
                score -= rules.news_delta;
                reasons.push(format!(
                    "Negative news about {} ({} articles)",
                    signal.name,
                    matched.len()
                ));
            }
        }

        if let Some(macro_signal) = ctx.macro_signal {
            let tier = self.universe.haven(&signal.name);
            score += macro_signal.score * tier.weight(&self.weights.macro_signal);
            match tier {
                HavenTier::Primary => reasons.extend(macro_signal.reasons.iter().cloned()),
                HavenTier::Secondary if macro_signal.score != 0.0 => {
                    reasons.push("Global debt favors safe-haven assets".to_string());
                }
                HavenTier::Secondary | HavenTier::None => {}
            }
        }

        let action = Action::from_score(score, &self.weights.actions);
        let risk_level = RiskLevel::assess(signal.volatility, action, &self.weights.actions);

        debug!(asset = %signal.name, score, %action, "Scored asset");

        Recommendation {
            asset_name: signal.name.clone(),
            score,
            action,
            risk_level,
            reasons,
            latest_price: signal.latest_price,
            pct_change_5d: signal.pct_change_5d,
            pct_change_20d: signal.pct_change_20d,
            volatility: signal.volatility,
        }
    }

    /// Score every asset and sort by score, highest first (stable)
    pub fn rank_assets(
        &self,
        signals: &[AssetSignal],
        aggregate_sentiment: f64,
        news: &[ScoredRecord],
        macro_signal: Option<&MacroSignal>,
    ) -> Vec<Recommendation> {
        let ctx = MarketContext {
            aggregate_sentiment,
            news,
            macro_signal,
            reference_change_5d: signals
                .iter()
                .find(|s| self.universe.is_reference(&s.name))
                .map(|s| s.pct_change_5d),
        };

        let mut ranked: Vec<Recommendation> = signals
            .iter()
            .map(|signal| self.score_asset(signal, &ctx))
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Profile, confidence and market volatility for a finished ranking
    pub fn assess(&self, signals: &[AssetSignal], aggregate_sentiment: f64, news_count: usize) -> MarketAssessment {
        let market_volatility = if signals.is_empty() {
            0.0
        } else {
            signals.iter().map(|s| s.volatility).sum::<f64>() / signals.len() as f64
        };

        MarketAssessment {
            profile: InvestorProfile::choose(aggregate_sentiment, market_volatility, &self.weights.profile),
            confidence: confidence(news_count, &self.weights.profile),
            aggregate_sentiment,
            market_volatility,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestorProfile {
    Aggressive,
    Moderate,
    Conservative,
}

impl InvestorProfile {
    pub fn choose(aggregate_sentiment: f64, market_volatility: f64, weights: &ProfileWeights) -> Self {
        if aggregate_sentiment > weights.aggressive_sentiment
            && market_volatility < weights.aggressive_max_volatility
        {
            Self::Aggressive
        } else if aggregate_sentiment < weights.conservative_sentiment
            || market_volatility > weights.conservative_min_volatility
        {
            Self::Conservative
        } else {
            Self::Moderate
        }
    }
}

impl fmt::Display for InvestorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Aggressive => "Aggressive",
            Self::Moderate => "Moderate",
            Self::Conservative => "Conservative",
        };
        f.write_str(s)
    }
}

/// Confidence in percent, growing with the amount of news
pub fn confidence(news_count: usize, weights: &ProfileWeights) -> f64 {
    (weights.base_confidence + weights.confidence_per_record * news_count as f64)
        .min(weights.max_confidence)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketAssessment {
    pub profile: InvestorProfile,
    pub confidence: f64,
    pub aggregate_sentiment: f64,
    /// Mean volatility across ranked assets
    pub market_volatility: f64,
}
