//! Market configuration.
//!
//! All amounts are micro-units (see [`constants::SCALE`]). The configuration
//! is fixed when the market is created.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{MarketError, Result, constants};

/// Pricing, limit and redemption parameters for one market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Price of a whole share when the outcome is tied or trailing.
    pub base_price: u64,
    /// Share-units of lead per price tick.
    pub skew_sensitivity: u64,
    /// Price increment per tick.
    pub price_step: u64,
    /// Largest payment accepted by a single purchase.
    pub max_bet: u64,
    /// Payout for one whole winning share. Applied on both the reserve and
    /// the claim path.
    pub redemption_per_share: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_price: constants::DEFAULT_BASE_PRICE,
            skew_sensitivity: constants::DEFAULT_SKEW_SENSITIVITY,
            price_step: constants::DEFAULT_PRICE_STEP,
            max_bet: constants::DEFAULT_MAX_BET,
            redemption_per_share: constants::DEFAULT_REDEMPTION_PER_SHARE,
        }
    }
}

impl MarketConfig {
    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        if self.base_price == 0 {
            return Err(MarketError::Configuration(
                "base_price must be > 0".to_string(),
            ));
        }
        if self.skew_sensitivity == 0 {
            return Err(MarketError::Configuration(
                "skew_sensitivity must be > 0".to_string(),
            ));
        }
        if self.max_bet == 0 {
            return Err(MarketError::Configuration(
                "max_bet must be > 0".to_string(),
            ));
        }
        if self.redemption_per_share == 0 {
            return Err(MarketError::Configuration(
                "redemption_per_share must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}
