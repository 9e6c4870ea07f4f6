//! Ledger configuration.
//!
//! Loaded from JSON by hosts; every field has a default taken from
//! [`crate::constants`].

use serde::{Deserialize, Serialize};

use crate::{AssetId, DealvaultError, Result, constants};

/// Per-asset override of the minimum deal amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMinimum {
    pub asset: AssetId,
    pub min_amount: u128,
}

/// Configuration for one escrow ledger instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Smallest amount accepted by `createEscrow` when no override applies.
    pub min_amount: u128,
    /// Overrides of `min_amount` for specific assets (e.g. 18-decimal native).
    pub asset_minimums: Vec<AssetMinimum>,
    /// Fee = amount / `fee_divisor`, floor division.
    pub fee_divisor: u128,
    /// Seconds after delivery before auto-release may be claimed.
    pub auto_release_window_secs: u64,
    /// Seconds after a dispute opens before the buyer may reclaim.
    pub dispute_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_amount: constants::DEFAULT_MIN_AMOUNT,
            asset_minimums: Vec::new(),
            fee_divisor: constants::DEFAULT_FEE_DIVISOR,
            auto_release_window_secs: constants::AUTO_RELEASE_WINDOW_SECS,
            dispute_timeout_secs: constants::DISPUTE_TIMEOUT_SECS,
        }
    }
}

impl LedgerConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    /// `Serialization` on malformed JSON, `Configuration` on invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the ledger cannot operate with.
    ///
    /// # Errors
    /// Returns [`DealvaultError::Configuration`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.fee_divisor == 0 {
            return Err(DealvaultError::Configuration(
                "fee_divisor must be > 0".into(),
            ));
        }
        if self.auto_release_window_secs == 0 {
            return Err(DealvaultError::Configuration(
                "auto_release_window_secs must be > 0".into(),
            ));
        }
        if self.dispute_timeout_secs == 0 {
            return Err(DealvaultError::Configuration(
                "dispute_timeout_secs must be > 0".into(),
            ));
        }
        for (i, m) in self.asset_minimums.iter().enumerate() {
            if self.asset_minimums[..i].iter().any(|o| o.asset == m.asset) {
                return Err(DealvaultError::Configuration(format!(
                    "duplicate minimum for {}",
                    m.asset
                )));
            }
        }
        Ok(())
    }

    /// Minimum deal amount for `asset`.
    #[must_use]
    pub fn min_amount_for(&self, asset: &AssetId) -> u128 {
        self.asset_minimums
            .iter()
            .find(|m| &m.asset == asset)
            .map_or(self.min_amount, |m| m.min_amount)
    }

    /// Settlement fee on `amount`, rounded down.
    #[must_use]
    pub fn fee_for(&self, amount: u128) -> u128 {
        amount / self.fee_divisor
    }

    /// Same config with a per-asset minimum added or replaced.
    #[must_use]
    pub fn with_asset_minimum(mut self, asset: AssetId, min_amount: u128) -> Self {
        self.asset_minimums.retain(|m| m.asset != asset);
        self.asset_minimums.push(AssetMinimum { asset, min_amount });
        self
    }
}
