//! NewsAPI client (newsapi.org)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SharedRateLimiter, http_client, rate_limiter};
use crate::error::{MarketError, Result};
use crate::ingest::{NewsApiArticle, RawRecord, SourceAdapter};

const BASE_URL: &str = "https://newsapi.org/v2";

/// Response envelope shared by every NewsAPI endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl NewsApiResponse {
    /// Articles of an `ok` response, or the provider error
    pub fn into_articles(self) -> Result<Vec<NewsApiArticle>> {
        if self.status == "ok" {
            return Ok(self.articles);
        }

        if self.code.as_deref() == Some("rateLimited") {
            return Err(MarketError::RateLimitExceeded {
                provider: "NewsAPI".to_string(),
            });
        }

        Err(MarketError::NewsApiError(
            self.message
                .or(self.code)
                .unwrap_or_else(|| format!("status {}", self.status)),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl NewsApiClient {
    /// Create a client allowing `rate_limit` requests per minute
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
            rate_limiter: rate_limiter(rate_limit),
        })
    }

    /// Search all articles matching `query` from the last `days` days, newest first
    pub async fn everything(&self, query: &str, days: u32, language: &str) -> Result<Vec<NewsApiArticle>> {
        let from = (Utc::now() - chrono::Duration::days(i64::from(days)))
            .format("%Y-%m-%d")
            .to_string();

        let params = [
            ("q", query),
            ("from", from.as_str()),
            ("language", language),
            ("sortBy", "publishedAt"),
            ("pageSize", "100"),
        ];

        let mut articles = self.get("everything", &params).await?;
        for article in &mut articles {
            article.language.get_or_insert_with(|| language.to_string());
        }
        Ok(articles)
    }

    /// Top headlines for `query` in one country (ISO 3166 alpha-2)
    pub async fn top_headlines(&self, query: &str, country: &str) -> Result<Vec<NewsApiArticle>> {
        let params = [("q", query), ("country", country), ("pageSize", "50")];

        let articles = self.get("top-headlines", &params).await?;
        Ok(tag_country(articles, country))
    }

    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<NewsApiArticle>> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(format!("{BASE_URL}/{endpoint}"))
            .header("X-Api-Key", &self.api_key)
            .query(params)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketError::RateLimitExceeded {
                provider: "NewsAPI".to_string(),
            });
        }

        let body: NewsApiResponse = response.json().await?;
        let articles = body.into_articles()?;
        debug!(endpoint, count = articles.len(), "NewsAPI response");
        Ok(articles)
    }
}

/// Stamp headlines with the requested country unless the payload carries one
fn tag_country(mut articles: Vec<NewsApiArticle>, country: &str) -> Vec<NewsApiArticle> {
    for article in &mut articles {
        article.country.get_or_insert_with(|| country.to_string());
    }
    articles
}

/// Source adapter running one `everything` query
pub struct NewsApiAdapter {
    client: Arc<NewsApiClient>,
    query: String,
    days: u32,
    language: String,
}

impl NewsApiAdapter {
    pub fn new(client: Arc<NewsApiClient>, query: impl Into<String>, days: u32, language: impl Into<String>) -> Self {
        Self {
            client,
            query: query.into(),
            days,
            language: language.into(),
        }
    }
}

#[async_trait]
impl SourceAdapter for NewsApiAdapter {
    fn name(&self) -> String {
        format!("newsapi:{}", self.query)
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let articles = self
            .client
            .everything(&self.query, self.days, &self.language)
            .await?;
        Ok(articles.into_iter().map(RawRecord::NewsApi).collect())
    }
}

/// Source adapter polling one country's top headlines
pub struct NewsApiHeadlinesAdapter {
    client: Arc<NewsApiClient>,
    query: String,
    country: String,
}

impl NewsApiHeadlinesAdapter {
    pub fn new(client: Arc<NewsApiClient>, query: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            client,
            query: query.into(),
            country: country.into(),
        }
    }
}

#[async_trait]
impl SourceAdapter for NewsApiHeadlinesAdapter {
    fn name(&self) -> String {
        format!("newsapi-headlines:{}:{}", self.country, self.query)
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let articles = self.client.top_headlines(&self.query, &self.country).await?;
        Ok(articles.into_iter().map(RawRecord::NewsApi).collect())
    }
}
