//! Configuration for market data collection and scoring

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::ForecastDrivers;
use crate::engine::universe::AssetUniverse;
use crate::engine::weights::ScoringWeights;
use crate::error::{MarketError, Result};

/// Configuration for providers, caching and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// NewsAPI key (optional)
    pub newsapi_key: Option<String>,

    /// Alpha Vantage API key (optional)
    pub alpha_vantage_api_key: Option<String>,

    /// NewsAPI requests per minute
    pub newsapi_rate_limit: u32,

    /// Alpha Vantage requests per minute (free tier: 5)
    pub alpha_vantage_rate_limit: u32,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// NewsAPI search query
    pub news_query: String,

    /// How many days of news to request
    pub news_days: u32,

    /// ISO 639-1 language of requested news
    pub news_language: String,

    /// ISO 3166 countries polled for top headlines; empty disables them
    pub news_countries: Vec<String>,

    /// Query for country top headlines
    pub headlines_query: String,

    /// Alpha Vantage NEWS_SENTIMENT tickers
    pub news_tickers: String,

    /// Maximum items per Alpha Vantage news request
    pub news_limit: u32,

    /// Cache TTL for news
    pub cache_ttl_news: Duration,

    /// Cache TTL for macro data
    pub cache_ttl_macro: Duration,

    /// Cache TTL for price series
    pub cache_ttl_prices: Duration,

    /// Poll news providers on live refreshes
    pub live_news: bool,

    /// Fetch daily closes from Alpha Vantage on live refreshes; universe symbols
    /// must then be Alpha Vantage symbols
    pub live_prices: bool,

    pub weights: ScoringWeights,
    pub universe: AssetUniverse,
    pub forecast: ForecastDrivers,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            newsapi_key: None,
            alpha_vantage_api_key: None,
            newsapi_rate_limit: 30,
            alpha_vantage_rate_limit: 5,
            request_timeout: Duration::from_secs(30),
            news_query: "gold price".to_string(),
            news_days: 7,
            news_language: "en".to_string(),
            news_countries: Vec::new(),
            headlines_query: "gold".to_string(),
            news_tickers: "FOREX:XAU".to_string(),
            news_limit: 50,
            cache_ttl_news: Duration::from_secs(30 * 60),       // 30 minutes
            cache_ttl_macro: Duration::from_secs(24 * 60 * 60), // 24 hours
            cache_ttl_prices: Duration::from_secs(60 * 60),     // 1 hour
            live_news: true,
            live_prices: false,
            weights: ScoringWeights::default(),
            universe: AssetUniverse::default(),
            forecast: ForecastDrivers::default(),
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Load a JSON configuration file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Fill API keys from `NEWSAPI_KEY` and `ALPHA_VANTAGE_API_KEY` when set
    pub fn with_env_keys(mut self) -> Self {
        if let Ok(key) = std::env::var("NEWSAPI_KEY") {
            self.newsapi_key = Some(key);
        }
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.newsapi_rate_limit == 0 || self.alpha_vantage_rate_limit == 0 {
            return Err(MarketError::ConfigError(
                "rate limits must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(MarketError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.news_days == 0 {
            return Err(MarketError::ConfigError(
                "news_days must be greater than 0".to_string(),
            ));
        }

        if self.news_countries.iter().any(|c| c.trim().is_empty()) {
            return Err(MarketError::ConfigError(
                "news_countries entries must not be blank".to_string(),
            ));
        }

        self.universe.validate()?;
        self.weights.validate()?;

        Ok(())
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    newsapi_key: Option<String>,
    alpha_vantage_api_key: Option<String>,
    newsapi_rate_limit: Option<u32>,
    alpha_vantage_rate_limit: Option<u32>,
    request_timeout: Option<Duration>,
    news_query: Option<String>,
    news_days: Option<u32>,
    news_language: Option<String>,
    news_countries: Option<Vec<String>>,
    cache_ttl_news: Option<Duration>,
    cache_ttl_prices: Option<Duration>,
    live_news: Option<bool>,
    live_prices: Option<bool>,
    weights: Option<ScoringWeights>,
    universe: Option<AssetUniverse>,
}

impl MarketConfigBuilder {
    pub fn newsapi_key(mut self, key: impl Into<String>) -> Self {
        self.newsapi_key = Some(key.into());
        self
    }

    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    pub fn newsapi_rate_limit(mut self, per_minute: u32) -> Self {
        self.newsapi_rate_limit = Some(per_minute);
        self
    }

    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    pub fn news_query(mut self, query: impl Into<String>) -> Self {
        self.news_query = Some(query.into());
        self
    }

    pub fn news_days(mut self, days: u32) -> Self {
        self.news_days = Some(days);
        self
    }

    pub fn news_language(mut self, language: impl Into<String>) -> Self {
        self.news_language = Some(language.into());
        self
    }

    pub fn news_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.news_countries = Some(countries.into_iter().map(Into::into).collect());
        self
    }

    /// Set cache TTL for news
    pub fn cache_ttl_news(mut self, duration: Duration) -> Self {
        self.cache_ttl_news = Some(duration);
        self
    }

    /// Set cache TTL for price series
    pub fn cache_ttl_prices(mut self, duration: Duration) -> Self {
        self.cache_ttl_prices = Some(duration);
        self
    }

    pub fn live_news(mut self, enabled: bool) -> Self {
        self.live_news = Some(enabled);
        self
    }

    pub fn live_prices(mut self, enabled: bool) -> Self {
        self.live_prices = Some(enabled);
        self
    }

    pub fn weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn universe(mut self, universe: AssetUniverse) -> Self {
        self.universe = Some(universe);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let config = MarketConfig {
            newsapi_key: self.newsapi_key,
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            newsapi_rate_limit: self.newsapi_rate_limit.unwrap_or(defaults.newsapi_rate_limit),
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            news_query: self.news_query.unwrap_or(defaults.news_query),
            news_days: self.news_days.unwrap_or(defaults.news_days),
            news_language: self.news_language.unwrap_or(defaults.news_language),
            news_countries: self.news_countries.unwrap_or(defaults.news_countries),
            cache_ttl_news: self.cache_ttl_news.unwrap_or(defaults.cache_ttl_news),
            cache_ttl_prices: self.cache_ttl_prices.unwrap_or(defaults.cache_ttl_prices),
            live_news: self.live_news.unwrap_or(defaults.live_news),
            live_prices: self.live_prices.unwrap_or(defaults.live_prices),
            weights: self.weights.unwrap_or(defaults.weights),
            universe: self.universe.unwrap_or(defaults.universe),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}
