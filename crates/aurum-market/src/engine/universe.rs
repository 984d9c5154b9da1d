//! Tracked assets, the reference asset and the safe-haven tiers

use serde::{Deserialize, Serialize};

use super::weights::MacroWeights;
use crate::error::{MarketError, Result};

/// How strongly an asset benefits from macro instability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HavenTier {
    /// Receives the full macro score
    Primary,
    /// Receives a reduced share of the macro score
    Secondary,
    #[default]
    None,
}

impl HavenTier {
    /// Share of the macro score this tier receives
    pub fn weight(&self, weights: &MacroWeights) -> f64 {
        match self {
            Self::Primary => weights.primary_haven_weight,
            Self::Secondary => weights.secondary_haven_weight,
            Self::None => 0.0,
        }
    }
}

/// One tracked asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetProfile {
    /// Display name, e.g. "GOLD (GC=F)"
    pub name: String,
    /// Price source symbol, e.g. "GC=F"
    pub symbol: String,
    /// News keyword; defaults to the first word of the display name
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub haven: HavenTier,
}

impl AssetProfile {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            keyword: None,
            haven: HavenTier::None,
        }
    }

    pub fn with_haven(mut self, haven: HavenTier) -> Self {
        self.haven = haven;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Lowercase keyword used to match news text
    pub fn keyword(&self) -> String {
        self.keyword
            .clone()
            .unwrap_or_else(|| keyword_for(&self.name))
            .to_lowercase()
    }
}

/// First whitespace-separated word of a display name, lowercased
pub fn keyword_for(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// The set of assets the recommendation scorer ranks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetUniverse {
    /// Display name of the reference asset (skipped by the diversification rule)
    pub reference: String,
    pub assets: Vec<AssetProfile>,
}

impl Default for AssetUniverse {
    fn default() -> Self {
        Self {
            reference: "GOLD (GC=F)".to_string(),
            assets: vec![
                AssetProfile::new("GOLD (GC=F)", "GC=F").with_haven(HavenTier::Primary),
                AssetProfile::new("SILVER (SI=F)", "SI=F").with_haven(HavenTier::Secondary),
                AssetProfile::new("S&P 500", "^GSPC"),
                AssetProfile::new("NASDAQ", "^IXIC"),
                AssetProfile::new("BITCOIN", "BTC-USD").with_haven(HavenTier::Secondary),
                AssetProfile::new("OIL (CL=F)", "CL=F"),
                AssetProfile::new("DOLLAR (DXY)", "DX-Y.NYB"),
                AssetProfile::new("EUR/USD", "EURUSD=X"),
            ],
        }
    }
}

impl AssetUniverse {
    pub fn new(reference: impl Into<String>, assets: Vec<AssetProfile>) -> Self {
        Self {
            reference: reference.into(),
            assets,
        }
    }

    pub fn get(&self, name: &str) -> Option<&AssetProfile> {
        self.assets.iter().find(|a| a.name == name)
    }

    pub fn is_reference(&self, name: &str) -> bool {
        self.reference == name
    }

    /// Haven tier of an asset; unknown assets are not havens
    pub fn haven(&self, name: &str) -> HavenTier {
        self.get(name).map(|a| a.haven).unwrap_or_default()
    }

    /// News keyword of an asset; unknown assets fall back to their name's first word
    pub fn keyword(&self, name: &str) -> String {
        self.get(name)
            .map_or_else(|| keyword_for(name), AssetProfile::keyword)
    }

    /// Fails when the reference asset is not part of the universe
    pub fn validate(&self) -> Result<()> {
        if self.get(&self.reference).is_none() {
            return Err(MarketError::ConfigError(format!(
                "reference asset '{}' is not in the universe",
                self.reference
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_name() {
        assert_eq!(keyword_for("GOLD (GC=F)"), "gold");
        assert_eq!(keyword_for("S&P 500"), "s&p");
        assert_eq!(keyword_for(""), "");

        let custom = AssetProfile::new("DOLLAR (DXY)", "DX-Y.NYB").with_keyword("Greenback");
        assert_eq!(custom.keyword(), "greenback");
    }

    #[test]
    fn test_default_universe() {
        let universe = AssetUniverse::default();
        assert!(universe.validate().is_ok());
        assert!(universe.is_reference("GOLD (GC=F)"));
        assert_eq!(universe.haven("GOLD (GC=F)"), HavenTier::Primary);
        assert_eq!(universe.haven("SILVER (SI=F)"), HavenTier::Secondary);
        assert_eq!(universe.haven("BITCOIN"), HavenTier::Secondary);
        assert_eq!(universe.haven("NASDAQ"), HavenTier::None);
        assert_eq!(universe.haven("UNKNOWN"), HavenTier::None);
        assert_eq!(universe.keyword("UNKNOWN ASSET"), "unknown");
    }

    #[test]
    fn test_haven_weights() {
        let w = MacroWeights::default();
        assert_eq!(HavenTier::Primary.weight(&w), 1.0);
        assert_eq!(HavenTier::Secondary.weight(&w), 0.5);
        assert_eq!(HavenTier::None.weight(&w), 0.0);
    }

    #[test]
    fn test_missing_reference() {
        let universe = AssetUniverse::new("PLATINUM", vec![AssetProfile::new("GOLD", "GC=F")]);
        match universe.validate() {
            Err(MarketError::ConfigError(msg)) => assert!(msg.contains("PLATINUM")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
