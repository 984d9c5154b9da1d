//! Error types for market data and scoring operations

use thiserror::Error;

/// Market pipeline specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// Data not available for the requested asset
    #[error("Data not available for {asset}: {reason}")]
    DataUnavailable {
        asset: String,
        reason: String,
    },

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Snapshot or cache file error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// NewsAPI error payload
    #[error("NewsAPI error: {0}")]
    NewsApiError(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// A sentiment analyzer could not process its input
    #[error("Sentiment analyzer error: {0}")]
    AnalyzerError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Convert anyhow::Error to MarketError
impl From<anyhow::Error> for MarketError {
    fn from(err: anyhow::Error) -> Self {
        MarketError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MarketError::RateLimitExceeded {
            provider: "NewsAPI".to_string(),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded for NewsAPI");

        let err = MarketError::DataUnavailable {
            asset: "GOLD (GC=F)".to_string(),
            reason: "fewer than 6 closes".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Data not available for GOLD (GC=F): fewer than 6 closes"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: MarketError = anyhow::anyhow!("boom").into();
        match err {
            MarketError::Other(msg) => assert_eq!(msg, "boom"),
            _ => panic!("Expected Other variant"),
        }

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: MarketError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
