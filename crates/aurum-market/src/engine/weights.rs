//! Rule weights and thresholds shared by the sentiment and recommendation scorers
//!
//! Every constant that shapes a score lives here so callers and tests can refer to
//! it by name. The defaults reproduce the published behaviour exactly; changing them
//! changes output compatibility.

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

/// Weights of the two sentiment analyzers in the blended score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    /// Weight of the social-text (VADER) compound score
    pub social: f64,
    /// Weight of the formal-text (pattern lexicon) polarity
    pub formal: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            social: 0.6,
            formal: 0.4,
        }
    }
}

impl BlendWeights {
    /// Blend the two sub-scores into one sentiment score
    pub fn blend(&self, social_compound: f64, formal_polarity: f64) -> f64 {
        self.social * social_compound + self.formal * formal_polarity
    }
}

/// Dead band around zero that separates the three sentiment labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelBand {
    /// Scores at or above this are positive
    pub positive: f64,
    /// Scores at or below this are negative
    pub negative: f64,
    /// Trimmed texts shorter than this (in characters) score neutral
    pub min_text_chars: usize,
}

impl Default for LabelBand {
    fn default() -> Self {
        Self {
            positive: 0.05,
            negative: -0.05,
            min_text_chars: 3,
        }
    }
}

/// Per-asset recommendation rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleWeights {
    /// 5-day change (percent) beyond which the trend rule fires
    pub trend_threshold: f64,
    pub trend_delta: f64,

    /// Aggregate sentiment beyond which the sentiment rule fires
    pub sentiment_threshold: f64,
    pub sentiment_delta: f64,

    /// Volatility (percent) above which a positive score is penalised
    pub high_volatility: f64,
    pub high_volatility_penalty: f64,
    /// Volatility (percent) below which stability is rewarded
    pub low_volatility: f64,
    pub low_volatility_bonus: f64,

    /// Reference asset 5-day change must exceed this for the rotation rule
    pub reference_rally: f64,
    /// Asset 5-day change must be below this for the rotation rule
    pub divergence_threshold: f64,
    pub diversification_bonus: f64,

    /// Mean keyword-matched news sentiment beyond which the news rule fires
    pub news_threshold: f64,
    pub news_delta: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            trend_threshold: 2.0,
            trend_delta: 30.0,
            sentiment_threshold: 0.2,
            sentiment_delta: 20.0,
            high_volatility: 3.0,
            high_volatility_penalty: 15.0,
            low_volatility: 1.0,
            low_volatility_bonus: 10.0,
            reference_rally: 0.0,
            divergence_threshold: -1.0,
            diversification_bonus: 15.0,
            news_threshold: 0.3,
            news_delta: 25.0,
        }
    }
}

/// Lower bounds of the action bands, evaluated top-down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionBands {
    /// Scores strictly above are STRONG_BUY
    pub strong_buy: f64,
    /// Scores strictly above are CONSIDER_BUY
    pub consider_buy: f64,
    /// Scores at or above are HOLD
    pub hold: f64,
    /// Scores at or above are CONSIDER_SELL, anything lower is STRONG_SELL
    pub consider_sell: f64,
    /// Volatility (percent) above which risk is reported as high
    pub high_risk_volatility: f64,
}

impl Default for ActionBands {
    fn default() -> Self {
        Self {
            strong_buy: 40.0,
            consider_buy: 10.0,
            hold: -10.0,
            consider_sell: -40.0,
            high_risk_volatility: 2.5,
        }
    }
}

/// Debt-to-GDP thresholds feeding the structural macro rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroWeights {
    /// (ratio threshold %, points), checked in order, first match wins
    pub ratio_tiers: [(f64, f64); 3],
    /// (YoY growth threshold %, points), checked in order, first match wins
    pub growth_tiers: [(f64, f64); 2],
    /// Absolute global debt in USD above which the record bonus applies
    pub record_debt_usd: f64,
    pub record_debt_bonus: f64,
    /// Fractional price impact per macro point
    pub price_impact_per_point: f64,
    /// Share of the macro score granted to primary and secondary havens
    pub primary_haven_weight: f64,
    pub secondary_haven_weight: f64,
}

impl Default for MacroWeights {
    fn default() -> Self {
        Self {
            ratio_tiers: [(300.0, 15.0), (280.0, 10.0), (250.0, 5.0)],
            growth_tiers: [(3.0, 10.0), (2.0, 5.0)],
            record_debt_usd: 320e12,
            record_debt_bonus: 5.0,
            price_impact_per_point: 0.02,
            primary_haven_weight: 1.0,
            secondary_haven_weight: 0.5,
        }
    }
}

/// Investor profile and confidence heuristics applied after ranking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileWeights {
    pub aggressive_sentiment: f64,
    pub aggressive_max_volatility: f64,
    pub conservative_sentiment: f64,
    pub conservative_min_volatility: f64,
    pub base_confidence: f64,
    pub confidence_per_record: f64,
    pub max_confidence: f64,
}

impl Default for ProfileWeights {
    fn default() -> Self {
        Self {
            aggressive_sentiment: 0.3,
            aggressive_max_volatility: 2.0,
            conservative_sentiment: -0.3,
            conservative_min_volatility: 3.0,
            base_confidence: 60.0,
            confidence_per_record: 0.5,
            max_confidence: 95.0,
        }
    }
}

/// The complete scoring table
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub blend: BlendWeights,
    pub labels: LabelBand,
    pub rules: RuleWeights,
    pub actions: ActionBands,
    pub macro_signal: MacroWeights,
    pub profile: ProfileWeights,
}

impl ScoringWeights {
    /// Check internal consistency of the table
    pub fn validate(&self) -> Result<()> {
        if self.labels.negative > self.labels.positive {
            return Err(MarketError::ConfigError(format!(
                "label band inverted: negative {} > positive {}",
                self.labels.negative, self.labels.positive
            )));
        }

        let a = &self.actions;
        if !(a.strong_buy >= a.consider_buy && a.consider_buy >= a.hold && a.hold >= a.consider_sell)
        {
            return Err(MarketError::ConfigError(
                "action bands must be non-increasing from STRONG_BUY down".to_string(),
            ));
        }

        if self.blend.social < 0.0 || self.blend.formal < 0.0 {
            return Err(MarketError::ConfigError(
                "blend weights must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}
