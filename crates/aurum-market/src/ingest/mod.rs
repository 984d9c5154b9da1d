//! Source adapters and record normalization
//!
//! Adapters return provider-shaped [`RawRecord`]s. [`collect_sources`] fans the
//! adapters out concurrently and waits for all of them before anything is
//! normalized, so the merged order depends only on the configured adapter order.

pub mod normalize;
pub mod raw;
pub mod record;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

pub use normalize::{normalize, normalize_at};
pub use raw::{AlphaVantageFeedItem, NewsApiArticle, RawRecord, ScrapedArticle, Tweet};
pub use record::TextRecord;

/// Records produced by one adapter in one refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterOutput {
    pub source: String,
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

impl AdapterOutput {
    pub fn new(source: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }
}

/// A provider that can be polled for raw text records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable adapter name used in logs and outputs
    fn name(&self) -> String;

    /// Fetch the current batch of records
    async fn fetch(&self) -> Result<Vec<RawRecord>>;
}

/// Poll every adapter concurrently and collect the successful outputs
///
/// Outputs come back in the order of `adapters`, not completion order. A failing
/// adapter is logged and left out.
pub async fn collect_sources(adapters: &[Arc<dyn SourceAdapter>]) -> Vec<AdapterOutput> {
    let fetches = adapters.iter().map(|adapter| async move {
        let name = adapter.name();
        let result = adapter.fetch().await;
        (name, result)
    });

    let results = join_all(fetches).await;

    results
        .into_iter()
        .filter_map(|(name, result)| match result {
            Ok(records) => {
                info!(adapter = %name, count = records.len(), "Collected records");
                Some(AdapterOutput::new(name, records))
            }
            Err(e) => {
                warn!(adapter = %name, error = %e, "Source adapter failed, skipping");
                None
            }
        })
        .collect()
}
