//! Structural macro signal from global debt levels

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::weights::MacroWeights;

/// One year of global debt and world GDP, in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtObservation {
    pub year: i32,
    pub debt_usd: f64,
    pub gdp_usd: f64,
}

impl DebtObservation {
    /// Debt-to-GDP in percent
    pub fn ratio_pct(&self) -> f64 {
        self.debt_usd / self.gdp_usd * 100.0
    }
}

const fn obs(year: i32, debt_t: f64, gdp_t: f64) -> DebtObservation {
    DebtObservation {
        year,
        debt_usd: debt_t * 1e12,
        gdp_usd: gdp_t * 1e12,
    }
}

/// Global debt estimates (IIF / IMF); 2024 is estimated and 2025 projected
pub const GLOBAL_DEBT_HISTORY: &[DebtObservation] = &[
    obs(2015, 199.0, 75.0),
    obs(2016, 217.0, 76.0),
    obs(2017, 233.0, 81.0),
    obs(2018, 243.0, 86.0),
    obs(2019, 253.0, 88.0),
    obs(2020, 281.0, 84.0),
    obs(2021, 303.0, 96.0),
    obs(2022, 307.0, 101.0),
    obs(2023, 313.0, 105.0),
    obs(2024, 320.0, 109.0),
    obs(2025, 328.0, 112.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtRiskLevel {
    VeryHigh,
    High,
    Moderate,
}

impl DebtRiskLevel {
    /// Above 300 % very high, above 250 % high
    pub fn from_ratio(ratio_pct: f64) -> Self {
        if ratio_pct > 300.0 {
            Self::VeryHigh
        } else if ratio_pct > 250.0 {
            Self::High
        } else {
            Self::Moderate
        }
    }
}

impl fmt::Display for DebtRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VeryHigh => "VERY HIGH",
            Self::High => "HIGH",
            Self::Moderate => "MODERATE",
        };
        write!(f, "{s}")
    }
}

/// Macro inputs: debt ratio, YoY debt growth and absolute debt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Debt-to-GDP, percent
    pub ratio_pct: f64,
    /// Year-over-year debt growth, percent
    pub growth_pct: f64,
    pub debt_usd: f64,
}

impl DebtSnapshot {
    pub fn new(ratio_pct: f64, growth_pct: f64, debt_usd: f64) -> Self {
        Self {
            year: None,
            ratio_pct,
            growth_pct,
            debt_usd,
        }
    }

    /// Snapshot of the last year in `history`, growth measured against the year before
    pub fn from_history(history: &[DebtObservation]) -> Option<Self> {
        let [.., previous, current] = history else {
            return None;
        };

        Some(Self {
            year: Some(current.year),
            ratio_pct: current.ratio_pct(),
            growth_pct: (current.debt_usd - previous.debt_usd) / previous.debt_usd * 100.0,
            debt_usd: current.debt_usd,
        })
    }

    /// Snapshot of the most recent year of the built-in series
    pub fn latest() -> Option<Self> {
        Self::from_history(GLOBAL_DEBT_HISTORY)
    }

    pub fn risk_level(&self) -> DebtRiskLevel {
        DebtRiskLevel::from_ratio(self.ratio_pct)
    }
}

/// Macro contribution to haven assets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroSignal {
    pub score: f64,
    pub reasons: Vec<String>,
    /// Fractional price impact used by the forecast
    pub price_impact: f64,
}

const RATIO_LABELS: [&str; 3] = [
    "extreme, gold as safe haven",
    "high, upward pressure on gold",
    "elevated, demand for gold",
];

const GROWTH_LABELS: [&str; 2] = ["systemic risk", "favors gold"];

impl MacroSignal {
    /// Score a debt snapshot; tiers are checked in order and the first match wins
    pub fn evaluate(snapshot: &DebtSnapshot, weights: &MacroWeights) -> Self {
        let mut score = 0.0;
        let mut reasons = Vec::new();

        if let Some((i, &(_, points))) = weights
            .ratio_tiers
            .iter()
            .enumerate()
            .find(|(_, (threshold, _))| snapshot.ratio_pct > *threshold)
        {
            score += points;
            reasons.push(format!(
                "Debt/GDP {:.1}%: {}",
                snapshot.ratio_pct, RATIO_LABELS[i]
            ));
        }

        if let Some((i, &(_, points))) = weights
            .growth_tiers
            .iter()
            .enumerate()
            .find(|(_, (threshold, _))| snapshot.growth_pct > *threshold)
        {
            score += points;
            reasons.push(format!(
                "Debt growing {:.1}% a year: {}",
                snapshot.growth_pct, GROWTH_LABELS[i]
            ));
        }

        if snapshot.debt_usd > weights.record_debt_usd {
            score += weights.record_debt_bonus;
            reasons.push(format!(
                "Record global debt ${:.1}T: nervous market",
                snapshot.debt_usd / 1e12
            ));
        }

        match snapshot.risk_level() {
            DebtRiskLevel::VeryHigh => {
                reasons.push("Risk level VERY HIGH: gold is the optimal haven".to_string());
            }
            DebtRiskLevel::High => reasons.push("Risk level HIGH: gold attractive".to_string()),
            DebtRiskLevel::Moderate => {}
        }

        Self {
            score,
            reasons,
            price_impact: score * weights.price_impact_per_point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_snapshot() {
        let snapshot = DebtSnapshot::latest().unwrap();
        assert_eq!(snapshot.year, Some(2025));
        assert!((snapshot.ratio_pct - 328.0 / 112.0 * 100.0).abs() < 1e-9);
        assert!((snapshot.growth_pct - 2.5).abs() < 1e-9);
        assert_eq!(snapshot.risk_level(), DebtRiskLevel::High);
    }

    #[test]
    fn test_history_needs_two_years() {
        assert!(DebtSnapshot::from_history(&GLOBAL_DEBT_HISTORY[..1]).is_none());
        assert!(DebtSnapshot::from_history(&[]).is_none());
    }

    #[test]
    fn test_builtin_signal() {
        let snapshot = DebtSnapshot::latest().unwrap();
        let signal = MacroSignal::evaluate(&snapshot, &MacroWeights::default());
        // 292.9 % -> +10, 2.5 % growth -> +5, $328T -> +5
        assert_eq!(signal.score, 20.0);
        assert_eq!(signal.reasons.len(), 4);
        assert!(signal.reasons[0].starts_with("Debt/GDP 292.9%"));
        assert!(signal.reasons[3].contains("HIGH"));
        assert!((signal.price_impact - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_tiers_first_match_wins() {
        let w = MacroWeights::default();

        let extreme = MacroSignal::evaluate(&DebtSnapshot::new(310.0, 3.5, 330e12), &w);
        assert_eq!(extreme.score, 30.0);
        assert!(extreme.reasons.last().unwrap().contains("VERY HIGH"));

        let elevated = MacroSignal::evaluate(&DebtSnapshot::new(260.0, 1.0, 100e12), &w);
        assert_eq!(elevated.score, 5.0);

        let calm = MacroSignal::evaluate(&DebtSnapshot::new(200.0, 1.0, 100e12), &w);
        assert_eq!(calm.score, 0.0);
        assert!(calm.reasons.is_empty());
        assert_eq!(calm.price_impact, 0.0);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let w = MacroWeights::default();
        let at = MacroSignal::evaluate(&DebtSnapshot::new(250.0, 2.0, 320e12), &w);
        assert_eq!(at.score, 0.0);
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(DebtRiskLevel::from_ratio(300.1), DebtRiskLevel::VeryHigh);
        assert_eq!(DebtRiskLevel::from_ratio(300.0), DebtRiskLevel::High);
        assert_eq!(DebtRiskLevel::from_ratio(250.0), DebtRiskLevel::Moderate);
        assert_eq!(DebtRiskLevel::VeryHigh.to_string(), "VERY HIGH");
    }
}
