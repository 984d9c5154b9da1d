//! Daily price series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

/// One daily bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// Closing prices of one asset with strictly increasing dates
///
/// Missing trading days stay missing; nothing is interpolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub asset: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting unordered dates or non-finite closes
    pub fn new(asset: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        let series = Self {
            asset: asset.into(),
            points,
        };
        series.validate()?;
        Ok(series)
    }

    /// Build a series from bars in any order
    ///
    /// Bars are sorted by date; for a repeated date the last bar wins, and bars with
    /// a non-finite or non-positive close are dropped.
    pub fn from_unsorted(asset: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite() && p.close > 0.0);
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self {
            asset: asset.into(),
            points: deduped,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.points.iter().find(|p| !p.close.is_finite() || p.close <= 0.0) {
            return Err(MarketError::DataUnavailable {
                asset: self.asset.clone(),
                reason: format!("invalid close {} on {}", bad.close, bad.date),
            });
        }

        if let Some(pair) = self.points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(MarketError::DataUnavailable {
                asset: self.asset.clone(),
                reason: format!("dates not strictly increasing at {}", pair[1].date),
            });
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Close on an exact date
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].close)
    }

    /// Fractional change of the latest close over `periods` bars
    pub fn pct_change(&self, periods: usize) -> Option<f64> {
        let n = self.points.len();
        if periods == 0 || n <= periods {
            return None;
        }
        let base = self.points[n - 1 - periods].close;
        let last = self.points[n - 1].close;
        Some(last / base - 1.0)
    }

    /// Fractional bar-over-bar changes
    pub fn daily_returns(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .map(|w| w[1].close / w[0].close - 1.0)
            .collect()
    }
}
