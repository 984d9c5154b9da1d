//! Linear next-price estimate for the reference asset from cross-asset drivers

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use super::prices::PriceSeries;

/// One driver asset and its historical correlation with the reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDriver {
    pub asset: String,
    pub coefficient: f64,
}

impl ForecastDriver {
    pub fn new(asset: impl Into<String>, coefficient: f64) -> Self {
        Self {
            asset: asset.into(),
            coefficient,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDrivers {
    pub drivers: Vec<ForecastDriver>,
    /// Weight of aggregate sentiment in the fractional move
    pub sentiment_coefficient: f64,
    /// Bars over which driver changes are measured
    pub horizon: usize,
    /// z-score of the confidence band
    pub band_z: f64,
}

impl Default for ForecastDrivers {
    fn default() -> Self {
        Self {
            drivers: vec![
                ForecastDriver::new("DOLLAR (DXY)", -0.72),
                ForecastDriver::new("S&P 500", -0.35),
                ForecastDriver::new("OIL (CL=F)", 0.45),
                ForecastDriver::new("BITCOIN", 0.15),
            ],
            sentiment_coefficient: 0.05,
            horizon: 5,
            band_z: 1.96,
        }
    }
}

/// Fractional contribution of one driver to the predicted move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverContribution {
    pub asset: String,
    /// Fractional change over the horizon; absent when the series is missing or short
    pub change: Option<f64>,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceForecast {
    pub asset: String,
    pub latest_price: f64,
    pub predicted_price: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Sample std of daily fractional returns
    pub daily_volatility: f64,
    pub contributions: Vec<DriverContribution>,
}

impl PriceForecast {
    /// Predicted move relative to the latest price, in percent
    pub fn expected_change_pct(&self) -> f64 {
        (self.predicted_price / self.latest_price - 1.0) * 100.0
    }
}

/// Predict the next price of `reference`
///
/// `latest × (1 + Σ coefᵢ·changeᵢ + k·sentiment + macro_impact)`, with a band of
/// `± z·σ` around the prediction. Missing drivers contribute nothing. `None` for
/// an empty reference series.
pub fn predict(
    reference: &PriceSeries,
    series: &[PriceSeries],
    aggregate_sentiment: f64,
    macro_impact: f64,
    drivers: &ForecastDrivers,
) -> Option<PriceForecast> {
    let latest_price = reference.latest()?.close;

    let contributions: Vec<DriverContribution> = drivers
        .drivers
        .iter()
        .map(|driver| {
            let change = series
                .iter()
                .find(|s| s.asset == driver.asset)
                .and_then(|s| s.pct_change(drivers.horizon));
            DriverContribution {
                asset: driver.asset.clone(),
                change,
                contribution: change.map_or(0.0, |c| c * driver.coefficient),
            }
        })
        .collect();

    let mv = contributions.iter().map(|c| c.contribution).sum::<f64>()
        + aggregate_sentiment * drivers.sentiment_coefficient
        + macro_impact;
    let predicted_price = latest_price * (1.0 + mv);

    let returns = reference.daily_returns();
    let daily_volatility = if returns.len() > 1 {
        returns.iter().std_dev()
    } else {
        0.0
    };
    let half_band = drivers.band_z * daily_volatility;

    Some(PriceForecast {
        asset: reference.asset.clone(),
        latest_price,
        predicted_price,
        lower_bound: predicted_price * (1.0 - half_band),
        upper_bound: predicted_price * (1.0 + half_band),
        daily_volatility,
        contributions,
    })
}
