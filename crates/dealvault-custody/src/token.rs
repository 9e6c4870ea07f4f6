//! Fungible token registry entries.
//!
//! Each registered token has display metadata, an allowance table (owner →
//! amount approved for custody to pull) and a transfer behavior used to
//! model tokens that misreport or revert.

use std::collections::HashMap;

use dealvault_types::Address;
use serde::{Deserialize, Serialize};

/// Display metadata for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u32,
}

impl TokenInfo {
    #[must_use]
    pub fn new(symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }

    /// A 6-decimal USD stablecoin.
    #[must_use]
    pub fn usdc() -> Self {
        Self::new("USDC", 6)
    }
}

/// How a token's transfer primitive responds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferBehavior {
    /// Moves funds and reports success.
    #[default]
    Standard,
    /// Moves nothing and returns `false`.
    ReturnsFalse,
    /// Moves nothing and reverts.
    Reverts,
}

/// One fungible token known to the host.
#[derive(Debug, Clone)]
pub struct Token {
    pub info: TokenInfo,
    pub behavior: TransferBehavior,
    /// Amount each owner has approved custody to pull.
    allowances: HashMap<Address, u128>,
}

impl Token {
    #[must_use]
    pub fn new(info: TokenInfo) -> Self {
        Self {
            info,
            behavior: TransferBehavior::Standard,
            allowances: HashMap::new(),
        }
    }

    /// Set the allowance of `owner` (replaces any previous approval).
    pub fn approve(&mut self, owner: Address, amount: u128) {
        self.allowances.insert(owner, amount);
    }

    #[must_use]
    pub fn allowance(&self, owner: Address) -> u128 {
        self.allowances.get(&owner).copied().unwrap_or(0)
    }

    /// Consume `amount` of `owner`'s allowance. Caller has checked it.
    pub(crate) fn spend_allowance(&mut self, owner: Address, amount: u128) {
        if let Some(a) = self.allowances.get_mut(&owner) {
            *a = a.saturating_sub(amount);
        }
    }
}
