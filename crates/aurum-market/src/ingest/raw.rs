//! Provider-shaped payloads accepted by the normalizer
//!
//! Each variant mirrors the JSON a provider returns. Every field is optional so a
//! partially filled item still deserializes; the conversion to [`TextRecord`]
//! substitutes sentinels for anything missing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::TextRecord;

/// Source reference nested in NewsAPI articles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsApiSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Article from NewsAPI `/v2/everything` or `/v2/top-headlines`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiArticle {
    #[serde(default)]
    pub source: NewsApiSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    /// Filled by the adapter for country headline queries
    #[serde(default)]
    pub country: Option<String>,
    /// Filled by the adapter from the query language
    #[serde(default)]
    pub language: Option<String>,
}

/// Item of the Alpha Vantage `NEWS_SENTIMENT` feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlphaVantageFeedItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// `YYYYMMDDTHHMMSS`
    #[serde(default)]
    pub time_published: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Vendor-computed sentiment; kept for reference, never used for scoring
    #[serde(default)]
    pub overall_sentiment_score: Option<f64>,
    #[serde(default)]
    pub overall_sentiment_label: Option<String>,
}

/// Tweet from the X/Twitter v2 recent search endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Headline scraped from a news site's HTML listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Site label, e.g. "Kitco"
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub scraped_at: Option<String>,
}

/// A raw item from any supported provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum RawRecord {
    NewsApi(NewsApiArticle),
    AlphaVantage(AlphaVantageFeedItem),
    Twitter(Tweet),
    Scraped(ScrapedArticle),
}

impl RawRecord {
    /// Map into the shared schema, defaulting missing fields
    ///
    /// A missing or unparseable timestamp becomes `ingested_at`; a missing title
    /// becomes the empty string.
    pub fn to_text_record(&self, ingested_at: DateTime<Utc>) -> TextRecord {
        match self {
            Self::NewsApi(a) => TextRecord::new(
                timestamp_or(a.published_at.as_deref(), ingested_at),
                a.title.clone().unwrap_or_default(),
                a.description.clone().unwrap_or_default(),
                a.source
                    .name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| "NewsAPI".to_string()),
            )
            .with_url(a.url.clone())
            .with_country(a.country.clone())
            .with_language(a.language.clone()),

            Self::AlphaVantage(item) => TextRecord::new(
                timestamp_or(item.time_published.as_deref(), ingested_at),
                item.title.clone().unwrap_or_default(),
                item.summary.clone().unwrap_or_default(),
                item.source
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| "Alpha Vantage".to_string()),
            )
            .with_url(item.url.clone()),

            // Tweets carry no headline; the text is the display title
            Self::Twitter(tweet) => TextRecord::new(
                timestamp_or(tweet.created_at.as_deref(), ingested_at),
                tweet.text.clone().unwrap_or_default(),
                "",
                "Twitter/X",
            )
            .with_url(tweet.id.as_ref().map(|id| format!("https://x.com/i/status/{id}")))
            .with_language(tweet.lang.clone()),

            Self::Scraped(article) => TextRecord::new(
                timestamp_or(article.scraped_at.as_deref(), ingested_at),
                article.title.clone().unwrap_or_default(),
                article.description.clone().unwrap_or_default(),
                article
                    .site
                    .as_ref()
                    .filter(|s| !s.trim().is_empty())
                    .map_or_else(|| "Web Scraping".to_string(), |s| format!("{s} (Web Scraping)")),
            )
            .with_url(article.url.clone())
            .with_country(article.country.clone()),
        }
    }
}

fn timestamp_or(raw: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(parse_timestamp).unwrap_or(fallback)
}

/// Parse the timestamp formats used by the supported providers
///
/// Accepts RFC 3339, Alpha Vantage's compact `YYYYMMDDTHHMMSS` (and its minute
/// variant), `YYYY-MM-DD HH:MM:SS` and bare dates. Naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y%m%dT%H%M%S", "%Y%m%dT%H%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
