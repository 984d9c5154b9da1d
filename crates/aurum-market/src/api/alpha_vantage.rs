//! Alpha Vantage API client: news sentiment feed and daily prices

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{SharedRateLimiter, http_client, rate_limiter};
use crate::analysis::{PricePoint, PriceSeries};
use crate::error::{MarketError, Result};
use crate::ingest::{AlphaVantageFeedItem, RawRecord, SourceAdapter};

const BASE_URL: &str = "https://www.alphavantage.co/query";

#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    /// Create a client allowing `rate_limit` requests per minute (free tier: 5)
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
            rate_limiter: rate_limiter(rate_limit),
        })
    }

    /// News items tagged with any of `tickers` (e.g. `FOREX:XAU`), newest first
    pub async fn news_sentiment(&self, tickers: &str, limit: u32) -> Result<Vec<AlphaVantageFeedItem>> {
        let limit = limit.to_string();
        let data = self
            .query(&[
                ("function", "NEWS_SENTIMENT"),
                ("tickers", tickers),
                ("sort", "LATEST"),
                ("limit", limit.as_str()),
            ])
            .await?;

        parse_feed(data)
    }

    /// Full daily close history of `symbol`, keyed by the display name `asset`
    pub async fn daily_series(&self, symbol: &str, asset: &str) -> Result<PriceSeries> {
        let data = self
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "full"),
            ])
            .await?;

        parse_daily_series(asset, &data)
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(BASE_URL)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::AlphaVantageError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        check_error(&data)?;
        Ok(data)
    }
}

/// Map Alpha Vantage's in-band error payloads onto errors
fn check_error(data: &Value) -> Result<()> {
    if let Some(error) = data.get("Error Message") {
        return Err(MarketError::AlphaVantageError(error.to_string()));
    }

    // throttled responses carry a "Note" or "Information" message instead of data
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(MarketError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        });
    }

    Ok(())
}

fn parse_feed(mut data: Value) -> Result<Vec<AlphaVantageFeedItem>> {
    let feed = data
        .get_mut("feed")
        .map(Value::take)
        .ok_or_else(|| MarketError::AlphaVantageError("No news feed found".to_string()))?;

    let items: Vec<AlphaVantageFeedItem> = serde_json::from_value(feed)?;
    debug!(count = items.len(), "Alpha Vantage news feed");
    Ok(items)
}

fn parse_daily_series(asset: &str, data: &Value) -> Result<PriceSeries> {
    let series = data
        .get("Time Series (Daily)")
        .and_then(Value::as_object)
        .ok_or_else(|| MarketError::DataUnavailable {
            asset: asset.to_string(),
            reason: "No daily data found".to_string(),
        })?;

    let field = |values: &Value, key: &str| -> Option<f64> {
        values.get(key)?.as_str()?.parse().ok()
    };

    let mut points = Vec::with_capacity(series.len());
    for (date, values) in series {
        let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
            warn!(asset, date = %date, "Skipping bar with unparseable date");
            continue;
        };
        let Some(close) = field(values, "4. close") else {
            continue;
        };

        let mut point = PricePoint::new(date, close);
        if let Some(volume) = field(values, "5. volume") {
            point = point.with_volume(volume);
        }
        points.push(point);
    }

    Ok(PriceSeries::from_unsorted(asset, points))
}

/// Source adapter for the NEWS_SENTIMENT feed
pub struct AlphaVantageNewsAdapter {
    client: Arc<AlphaVantageClient>,
    tickers: String,
    limit: u32,
}

impl AlphaVantageNewsAdapter {
    pub fn new(client: Arc<AlphaVantageClient>, tickers: impl Into<String>, limit: u32) -> Self {
        Self {
            client,
            tickers: tickers.into(),
            limit,
        }
    }
}

#[async_trait]
impl SourceAdapter for AlphaVantageNewsAdapter {
    fn name(&self) -> String {
        format!("alpha_vantage:{}", self.tickers)
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let items = self.client.news_sentiment(&self.tickers, self.limit).await?;
        Ok(items.into_iter().map(RawRecord::AlphaVantage).collect())
    }
}
