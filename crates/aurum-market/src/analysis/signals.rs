//! Per-asset trend and volatility signals

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use super::prices::PriceSeries;

/// Bars needed for a 5-day change
pub const MIN_BARS: usize = 6;

/// Trend and risk inputs of the recommendation scorer, in percent units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSignal {
    pub name: String,
    pub latest_price: f64,
    pub pct_change_5d: f64,
    /// Absent with fewer than 21 bars
    pub pct_change_20d: Option<f64>,
    /// Sample standard deviation of daily percent changes
    pub volatility: f64,
}

impl AssetSignal {
    /// Derive the signal from a price series; `None` with fewer than six bars
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        if series.len() < MIN_BARS {
            return None;
        }

        let latest_price = series.latest()?.close;
        let pct_change_5d = series.pct_change(5)? * 100.0;
        let pct_change_20d = series.pct_change(20).map(|c| c * 100.0);

        let returns = series.daily_returns();
        let volatility = if returns.len() > 1 {
            returns.iter().std_dev() * 100.0
        } else {
            0.0
        };

        Some(Self {
            name: series.asset.clone(),
            latest_price,
            pct_change_5d,
            pct_change_20d,
            volatility,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::prices::tests::series;

    #[test]
    fn test_too_short() {
        assert!(AssetSignal::from_series(&series("X", &[1.0, 2.0, 3.0, 4.0, 5.0])).is_none());
    }

    #[test]
    fn test_signal_values() {
        let s = series("GOLD", &[100.0, 101.0, 102.0, 103.0, 104.0, 110.0]);
        let signal = AssetSignal::from_series(&s).unwrap();

        assert_eq!(signal.name, "GOLD");
        assert_eq!(signal.latest_price, 110.0);
        assert!((signal.pct_change_5d - 10.0).abs() < 1e-9);
        assert!(signal.pct_change_20d.is_none());
        assert!(signal.volatility > 0.0);
    }

    #[test]
    fn test_flat_series_has_zero_volatility() {
        let closes = vec![50.0; 25];
        let signal = AssetSignal::from_series(&series("FLAT", &closes)).unwrap();
        assert_eq!(signal.pct_change_5d, 0.0);
        assert_eq!(signal.pct_change_20d, Some(0.0));
        assert_eq!(signal.volatility, 0.0);
    }
}
