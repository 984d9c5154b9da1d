//! Application-level configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment, read from `AURUM_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(anyhow::anyhow!("unknown environment: {other}")),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name
    pub app_name: String,
    /// Environment (development, production)
    pub environment: Environment,
    /// Emit JSON logs instead of human-readable ones
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "aurum".to_string(),
            environment: Environment::Development,
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Build from `AURUM_ENV` and `AURUM_JSON_LOGS`, falling back to defaults
    pub fn from_env() -> Self {
        let environment = std::env::var("AURUM_ENV")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let json_logs = std::env::var("AURUM_JSON_LOGS")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            environment,
            json_logs,
            ..Self::default()
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(
            " Development ".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.app_name, "aurum");
        assert!(!config.is_production());
        assert!(!config.json_logs);
    }

    #[test]
    fn test_environment_serde() {
        let json = serde_json::to_string(&Environment::Production).unwrap();
        assert_eq!(json, "\"production\"");
    }
}
