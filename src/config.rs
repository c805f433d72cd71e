//! Storefront configuration

use crate::core::error::Error;
use crate::Result;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Storefront configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Subtotal above which delivery is free (smallest currency unit)
    pub free_delivery_threshold: u64,
    /// Flat delivery fee charged at or below the threshold
    pub delivery_fee: u64,
    /// Maximum fuzzy search distance (0.0 = exact only, 1.0 = anything)
    pub search_threshold: f64,
    /// Simulated order placement latency in milliseconds
    pub placement_latency_ms: u64,
    /// Category shown before the user picks one
    pub default_category: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            free_delivery_threshold: 500,
            delivery_fee: 40,
            search_threshold: 0.4,
            placement_latency_ms: 2000,
            default_category: "burger".to_string(),
        }
    }
}

impl StoreConfig {
    /// Parses a JSON document; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.search_threshold) {
            return Err(Error::InvalidData(format!(
                "search_threshold must be within [0, 1], got {}",
                self.search_threshold
            )));
        }
        if self.default_category.trim().is_empty() {
            return Err(Error::InvalidData("default_category must not be empty".into()));
        }
        Ok(())
    }

    /// Simulated placement latency as a Duration
    pub fn placement_latency(&self) -> Duration {
        Duration::from_millis(self.placement_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = StoreConfig::from_json_str(r#"{ "delivery_fee": 25 }"#).unwrap();

        assert_eq!(config.delivery_fee, 25);
        assert_eq!(config.free_delivery_threshold, 500);
        assert_eq!(config.default_category, "burger");
        assert_eq!(config.placement_latency(), Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = StoreConfig::from_json_str(r#"{ "search_threshold": 1.5 }"#);
        assert!(matches!(result, Err(Error::InvalidData(_))));

        let result = StoreConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
