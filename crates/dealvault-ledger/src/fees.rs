//! Pull-based fee accrual.
//!
//! Settlements credit the arbiter's pending balance here instead of paying
//! out directly. The arbiter later pulls the whole balance in one step, so
//! a failing arbiter payout can never block a buyer or seller settlement.

use std::collections::HashMap;

use dealvault_types::{Address, AssetId, DealvaultError, Result};

/// Pending fee balances keyed by (arbiter, asset).
#[derive(Debug, Default)]
pub struct FeeLedger {
    pending: HashMap<(Address, AssetId), u128>,
}

impl FeeLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Whether `amount` can be credited without overflow.
    ///
    /// # Errors
    /// `BalanceOverflow`.
    pub fn check_credit(&self, arbiter: Address, asset: AssetId, amount: u128) -> Result<()> {
        self.pending(arbiter, asset)
            .checked_add(amount)
            .map(|_| ())
            .ok_or(DealvaultError::BalanceOverflow)
    }

    /// Add `amount` to the arbiter's pending balance. Zero credits are no-ops.
    ///
    /// # Errors
    /// `BalanceOverflow`.
    pub fn credit(&mut self, arbiter: Address, asset: AssetId, amount: u128) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        self.check_credit(arbiter, asset, amount)?;
        *self.pending.entry((arbiter, asset)).or_default() += amount;
        Ok(())
    }

    /// Pending balance of `arbiter` in `asset`.
    #[must_use]
    pub fn pending(&self, arbiter: Address, asset: AssetId) -> u128 {
        self.pending.get(&(arbiter, asset)).copied().unwrap_or(0)
    }

    /// Remove and return the full pending balance.
    ///
    /// # Errors
    /// `NoPendingFees` if nothing is pending.
    pub fn take(&mut self, arbiter: Address, asset: AssetId) -> Result<u128> {
        match self.pending.remove(&(arbiter, asset)) {
            Some(amount) if amount > 0 => Ok(amount),
            _ => Err(DealvaultError::NoPendingFees { arbiter, asset }),
        }
    }

    /// Sum of every arbiter's pending balance in `asset`.
    #[must_use]
    pub fn total_pending(&self, asset: AssetId) -> u128 {
        self.pending
            .iter()
            .filter(|((_, a), _)| *a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }
}
