//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize tracing subscriber with default configuration
///
/// `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize tracing with newline-delimited JSON output, for log shippers
pub fn init_tracing_json() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
