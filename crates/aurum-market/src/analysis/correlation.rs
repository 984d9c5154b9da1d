//! Pearson correlation between sentiment and prices, and across assets
//!
//! Samples are aligned on UTC calendar date by inner join. Several sentiment
//! samples on one date each pair with that date's close. No lag search and no
//! detrending.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

use super::prices::PriceSeries;
use crate::sentiment::DailySentiment;

/// One timestamped sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSample {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
}

impl SentimentSample {
    /// One sample per day, stamped at midnight UTC
    pub fn from_daily(days: &[DailySentiment]) -> Vec<Self> {
        days.iter()
            .filter_map(|d| {
                d.date.and_hms_opt(0, 0, 0).map(|naive| Self {
                    timestamp: naive.and_utc(),
                    score: d.mean_score,
                })
            })
            .collect()
    }
}

/// Outcome of a correlation; coefficient and p-value are absent when undefined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub sample_size: usize,
    pub coefficient: Option<f64>,
    pub p_value: Option<f64>,
}

impl CorrelationResult {
    pub fn undefined(sample_size: usize) -> Self {
        Self {
            sample_size,
            coefficient: None,
            p_value: None,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.coefficient.is_some()
    }

    pub fn strength(&self) -> Option<CorrelationStrength> {
        self.coefficient.map(CorrelationStrength::from_coefficient)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    /// |r| > 0.7 strong, > 0.4 moderate, otherwise weak
    pub fn from_coefficient(r: f64) -> Self {
        let r = r.abs();
        if r > 0.7 {
            Self::Strong
        } else if r > 0.4 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
        };
        write!(f, "{s}")
    }
}

/// Pearson r with a two-tailed p-value from Student's t (n - 2 df)
pub fn pearson(x: &[f64], y: &[f64]) -> CorrelationResult {
    let n = x.len().min(y.len());
    if n < 2 {
        return CorrelationResult::undefined(n);
    }
    let (x, y) = (&x[..n], &y[..n]);

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 || !(var_x.is_finite() && var_y.is_finite()) {
        return CorrelationResult::undefined(n);
    }

    let r = (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0);

    CorrelationResult {
        sample_size: n,
        coefficient: Some(r),
        p_value: two_tailed_p(r, n),
    }
}

fn two_tailed_p(r: f64, n: usize) -> Option<f64> {
    if n == 2 {
        return Some(1.0);
    }
    if r.abs() >= 1.0 {
        return Some(0.0);
    }

    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

/// Correlate sentiment samples with closes on the same UTC date
pub fn correlate(samples: &[SentimentSample], prices: &PriceSeries) -> CorrelationResult {
    let (sentiment, closes): (Vec<f64>, Vec<f64>) = samples
        .iter()
        .filter_map(|s| {
            prices
                .close_on(s.timestamp.date_naive())
                .map(|close| (s.score, close))
        })
        .unzip();

    debug!(
        asset = %prices.asset,
        samples = samples.len(),
        joined = sentiment.len(),
        "Aligned sentiment with prices"
    );

    pearson(&sentiment, &closes)
}

/// Correlation of one asset's closes with the reference asset's closes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCorrelation {
    pub asset: String,
    pub result: CorrelationResult,
}

/// Correlate each series against the reference on shared dates
///
/// The reference itself is skipped. Output keeps the input order.
pub fn cross_asset_correlations(reference: &PriceSeries, others: &[PriceSeries]) -> Vec<AssetCorrelation> {
    others
        .iter()
        .filter(|s| s.asset != reference.asset)
        .map(|series| {
            let (x, y): (Vec<f64>, Vec<f64>) = series
                .points
                .iter()
                .filter_map(|p| reference.close_on(p.date).map(|r| (r, p.close)))
                .unzip();

            AssetCorrelation {
                asset: series.asset.clone(),
                result: pearson(&x, &y),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::prices::tests::{day, series};
    use chrono::TimeZone;

    fn sample(day_offset: u32, hour: u32, score: f64) -> SentimentSample {
        SentimentSample {
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1 + day_offset, hour, 0, 0).unwrap(),
            score,
        }
    }

    #[test]
    fn test_fewer_than_two_points_is_undefined() {
        let prices = series("GOLD", &[100.0, 101.0, 102.0]);

        let result = correlate(&[], &prices);
        assert!(!result.is_defined());
        assert_eq!(result.sample_size, 0);

        let result = correlate(&[sample(0, 12, 0.3)], &prices);
        assert!(result.coefficient.is_none());
        assert!(result.p_value.is_none());
        assert_eq!(result.sample_size, 1);

        // no overlapping dates
        let result = correlate(&[sample(20, 1, 0.3), sample(21, 1, 0.1)], &prices);
        assert_eq!(result.sample_size, 0);
        assert!(!result.is_defined());
    }

    #[test]
    fn test_zero_variance_is_undefined() {
        let prices = series("GOLD", &[100.0, 101.0, 102.0]);
        let flat = [sample(0, 1, 0.2), sample(1, 1, 0.2), sample(2, 1, 0.2)];
        let result = correlate(&flat, &prices);
        assert_eq!(result.sample_size, 3);
        assert!(!result.is_defined());
    }

    #[test]
    fn test_two_points_p_is_one() {
        let prices = series("GOLD", &[100.0, 101.0]);
        let result = correlate(&[sample(0, 1, -0.1), sample(1, 1, 0.4)], &prices);
        assert!((result.coefficient.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(result.p_value, Some(1.0));
    }

    #[test]
    fn test_perfect_correlation() {
        let prices = series("GOLD", &[100.0, 102.0, 104.0, 106.0]);
        let samples: Vec<_> = (0..4).map(|i| sample(i, 8, f64::from(i) * 0.1)).collect();
        let result = correlate(&samples, &prices);
        assert!((result.coefficient.unwrap() - 1.0).abs() < 1e-12);
        assert!(result.p_value.unwrap() < 1e-6);
    }

    #[test]
    fn test_p_value_reference() {
        // x = 1..=5, y = [2, 4, 5, 4, 5]: r = 0.7746, p = 0.1240
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let result = pearson(&x, &y);
        assert!((result.coefficient.unwrap() - 0.774_596_669).abs() < 1e-6);
        assert!((result.p_value.unwrap() - 0.124_027).abs() < 1e-3);
    }

    #[test]
    fn test_same_day_samples_each_join() {
        let prices = series("GOLD", &[100.0, 110.0, 105.0]);
        let samples = [sample(0, 1, 0.1), sample(0, 20, 0.2), sample(1, 1, 0.9), sample(2, 1, 0.4)];
        let result = correlate(&samples, &prices);
        assert_eq!(result.sample_size, 4);
        assert!(result.is_defined());
    }

    #[test]
    fn test_cross_asset() {
        let gold = series("GOLD", &[100.0, 101.0, 102.0, 103.0]);
        let silver = series("SILVER", &[20.0, 20.5, 21.0, 21.5]);
        let dollar = series("DXY", &[105.0, 104.0, 103.0, 102.0]);
        let short = PriceSeries::new("BTC", vec![crate::analysis::prices::PricePoint::new(day(0), 1.0)]).unwrap();

        let results = cross_asset_correlations(&gold, &[gold.clone(), silver, dollar, short]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].asset, "SILVER");
        assert_eq!(results[0].result.strength(), Some(CorrelationStrength::Strong));
        assert!(results[1].result.coefficient.unwrap() < -0.99);
        assert!(!results[2].result.is_defined());
    }

    #[test]
    fn test_strength_bands() {
        assert_eq!(CorrelationStrength::from_coefficient(0.71), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::from_coefficient(-0.7), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::from_coefficient(0.41), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::from_coefficient(-0.4), CorrelationStrength::Weak);
    }
}
