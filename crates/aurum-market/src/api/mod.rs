//! HTTP clients for news and price providers, and their source adapters

pub mod alpha_vantage;
pub mod newsapi;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;

use crate::error::Result;

pub use alpha_vantage::{AlphaVantageClient, AlphaVantageNewsAdapter};
pub use newsapi::{NewsApiAdapter, NewsApiClient, NewsApiHeadlinesAdapter, NewsApiResponse};

pub(crate) type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Token-bucket limiter allowing `per_minute` requests; zero is treated as one
pub(crate) fn rate_limiter(per_minute: u32) -> SharedRateLimiter {
    let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(concat!("aurum/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
