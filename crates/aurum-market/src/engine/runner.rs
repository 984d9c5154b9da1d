//! Live refreshes: provider adapters behind TTL caches, feeding the pipeline

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::analysis::{DebtSnapshot, PriceSeries};
use crate::api::{
    AlphaVantageClient, AlphaVantageNewsAdapter, NewsApiAdapter, NewsApiClient, NewsApiHeadlinesAdapter,
};
use crate::cache::{CacheKey, CacheManager, FetchCache};
use crate::config::MarketConfig;
use crate::engine::pipeline::{MarketPipeline, MarketReport, MarketSnapshot};
use crate::error::{MarketError, Result};
use crate::ingest::{AdapterOutput, RawRecord, SourceAdapter, collect_sources};

/// Serves an adapter's last successful batch until the TTL expires
///
/// Failures are not cached, so the next refresh retries the provider.
pub struct CachedAdapter {
    inner: Arc<dyn SourceAdapter>,
    cache: FetchCache<Vec<RawRecord>>,
}

impl CachedAdapter {
    pub fn new(inner: Arc<dyn SourceAdapter>, cache: FetchCache<Vec<RawRecord>>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl SourceAdapter for CachedAdapter {
    fn name(&self) -> String {
        self.inner.name()
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let key = CacheKey::new(self.inner.name(), "fetch", ());
        self.cache.get_or_fetch(key, || self.inner.fetch()).await
    }
}

/// Repeated refreshes against live providers
pub struct LiveRunner {
    pipeline: MarketPipeline,
    caches: CacheManager,
    adapters: Vec<Arc<dyn SourceAdapter>>,
    price_client: Option<Arc<AlphaVantageClient>>,
}

impl LiveRunner {
    pub fn new(pipeline: MarketPipeline, caches: CacheManager) -> Self {
        Self {
            pipeline,
            caches,
            adapters: Vec::new(),
            price_client: None,
        }
    }

    /// Build provider clients for every configured API key
    ///
    /// News adapters are registered when `live_news` is set, the price client when
    /// `live_prices` is set and an Alpha Vantage key exists.
    pub fn from_config(config: &MarketConfig) -> Result<Self> {
        let pipeline = MarketPipeline::new(config)?;
        let caches = CacheManager::new(
            config.cache_ttl_news,
            config.cache_ttl_prices,
            config.cache_ttl_macro,
        );
        let mut runner = Self::new(pipeline, caches);

        if let Some(key) = config.newsapi_key.as_ref().filter(|_| config.live_news) {
            let client = Arc::new(NewsApiClient::new(
                key,
                config.newsapi_rate_limit,
                config.request_timeout,
            )?);
            runner = runner.with_adapter(Arc::new(NewsApiAdapter::new(
                Arc::clone(&client),
                &config.news_query,
                config.news_days,
                &config.news_language,
            )));
            for country in &config.news_countries {
                runner = runner.with_adapter(Arc::new(NewsApiHeadlinesAdapter::new(
                    Arc::clone(&client),
                    &config.headlines_query,
                    country,
                )));
            }
        }

        if let Some(key) = &config.alpha_vantage_api_key {
            let client = Arc::new(AlphaVantageClient::new(
                key,
                config.alpha_vantage_rate_limit,
                config.request_timeout,
            )?);
            if config.live_news {
                runner = runner.with_adapter(Arc::new(AlphaVantageNewsAdapter::new(
                    Arc::clone(&client),
                    &config.news_tickers,
                    config.news_limit,
                )));
            }
            if config.live_prices {
                runner = runner.with_price_client(client);
            }
        }

        if config.live_news && runner.adapters.is_empty() {
            warn!("No provider API keys configured, live refreshes add no news");
        }

        Ok(runner)
    }

    /// Register an adapter; its batches are cached with the news TTL
    pub fn with_adapter(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.adapters.push(Arc::new(CachedAdapter::new(
            adapter,
            self.caches.news.clone(),
        )));
        self
    }

    /// Fetch daily closes for every universe asset on refresh
    pub fn with_price_client(mut self, client: Arc<AlphaVantageClient>) -> Self {
        self.price_client = Some(client);
        self
    }

    pub fn pipeline(&self) -> &MarketPipeline {
        &self.pipeline
    }

    pub fn caches(&self) -> &CacheManager {
        &self.caches
    }

    pub fn adapter_names(&self) -> Vec<String> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Poll all adapters, cached
    pub async fn collect(&self) -> Vec<AdapterOutput> {
        collect_sources(&self.adapters).await
    }

    /// Latest built-in global debt snapshot, cached with the macro TTL
    pub async fn debt_snapshot(&self) -> Option<DebtSnapshot> {
        let key = CacheKey::new("builtin", "global_debt", ());
        let result = self
            .caches
            .macro_data
            .get_or_fetch(key, || async {
                DebtSnapshot::latest().ok_or_else(|| MarketError::DataUnavailable {
                    asset: "global debt".to_string(),
                    reason: "history has fewer than two years".to_string(),
                })
            })
            .await;

        match result {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "Macro data unavailable");
                None
            }
        }
    }

    /// Daily series for the universe assets; assets that fail are left out
    pub async fn fetch_prices(&self) -> Vec<PriceSeries> {
        let Some(client) = &self.price_client else {
            return Vec::new();
        };

        let mut series = Vec::new();
        // sequential so the provider rate limiter paces requests
        for asset in &self.pipeline.universe().assets {
            let key = CacheKey::new("alpha_vantage", "daily", &asset.symbol);
            let result = self
                .caches
                .prices
                .get_or_fetch(key, || client.daily_series(&asset.symbol, &asset.name))
                .await;

            match result {
                Ok(s) => series.push(s),
                Err(e) => warn!(asset = %asset.name, error = %e, "Price fetch failed, skipping"),
            }
        }
        series
    }

    /// Merge live data into `base` and run the pipeline
    ///
    /// Live adapter outputs follow the base sources. Live series replace base
    /// series of the same asset. The built-in debt snapshot is used when the base
    /// carries none.
    pub async fn refresh(&self, base: MarketSnapshot) -> MarketReport {
        let mut snapshot = base;

        let live = self.collect().await;
        let live_count: usize = live.iter().map(|o| o.records.len()).sum();
        snapshot.sources.extend(live);

        for series in self.fetch_prices().await {
            match snapshot.prices.iter_mut().find(|s| s.asset == series.asset) {
                Some(existing) => *existing = series,
                None => snapshot.prices.push(series),
            }
        }

        if snapshot.debt.is_none() {
            snapshot.debt = self.debt_snapshot().await;
        }

        info!(
            adapters = self.adapters.len(),
            live_records = live_count,
            series = snapshot.prices.len(),
            "Refreshing market report"
        );

        self.pipeline.run(snapshot)
    }
}
