//! Custody conservation checker.
//!
//! Invariant checked per asset after every operation:
//! ```text
//! custody_balance == Σ(amount of open deals) + Σ(pending fees)
//!                 == Σ(deposits) - Σ(payouts)
//! ```
//!
//! The first equality ties the adapter's real holdings to the ledger's
//! records; the second ties both to the ledger's own flow totals. A break in
//! either means value leaked or was created, and is logged at `error!`.
//!
//! The open-deal sum is kept as a running total so the post-commit check
//! never walks deal history.

use std::collections::{HashMap, HashSet};

use dealvault_types::{AssetId, DealvaultError, Result};

/// Running deposit and payout totals per asset.
#[derive(Debug, Default)]
pub struct CustodyAudit {
    /// Total moved into custody per asset since genesis.
    deposits: HashMap<AssetId, u128>,
    /// Total moved out of custody per asset since genesis.
    payouts: HashMap<AssetId, u128>,
    /// Sum of amounts in non-terminal deals per asset.
    open: HashMap<AssetId, u128>,
}

impl CustodyAudit {
    #[must_use]
    pub fn new() -> Self {
        Self {
            deposits: HashMap::new(),
            payouts: HashMap::new(),
            open: HashMap::new(),
        }
    }

    pub fn record_deposit(&mut self, asset: AssetId, amount: u128) {
        let total = self.deposits.entry(asset).or_default();
        *total = total.saturating_add(amount);
    }

    pub fn record_payout(&mut self, asset: AssetId, amount: u128) {
        let total = self.payouts.entry(asset).or_default();
        *total = total.saturating_add(amount);
    }

    /// A deal holding `amount` of `asset` was opened.
    pub fn open_deal(&mut self, asset: AssetId, amount: u128) {
        let total = self.open.entry(asset).or_default();
        *total = total.saturating_add(amount);
    }

    /// A deal holding `amount` of `asset` reached a terminal state.
    pub fn close_deal(&mut self, asset: AssetId, amount: u128) {
        let total = self.open.entry(asset).or_default();
        *total = total.saturating_sub(amount);
    }

    /// Running sum of open deal amounts in `asset`.
    #[must_use]
    pub fn open_total(&self, asset: AssetId) -> u128 {
        self.open.get(&asset).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_deposits(&self, asset: AssetId) -> u128 {
        self.deposits.get(&asset).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_payouts(&self, asset: AssetId) -> u128 {
        self.payouts.get(&asset).copied().unwrap_or(0)
    }

    /// What custody should hold according to the flow totals.
    ///
    /// # Errors
    /// `CustodyInvariantViolation` if more was paid out than deposited.
    pub fn expected_custody(&self, asset: AssetId) -> Result<u128> {
        let deposited = self.total_deposits(asset);
        let paid = self.total_payouts(asset);
        deposited
            .checked_sub(paid)
            .ok_or_else(|| DealvaultError::CustodyInvariantViolation {
                reason: format!("{asset}: payouts {paid} exceed deposits {deposited}"),
            })
    }

    /// Verify that `liabilities` (open deal amounts + pending fees) and the
    /// flow totals both match the adapter's `actual` custody balance.
    ///
    /// # Errors
    /// [`DealvaultError::CustodyInvariantViolation`] on any mismatch.
    pub fn verify(&self, asset: AssetId, actual: u128, liabilities: u128) -> Result<()> {
        let expected = self.expected_custody(asset)?;
        if actual != expected || actual != liabilities {
            return Err(DealvaultError::CustodyInvariantViolation {
                reason: format!(
                    "{asset}: custody {actual}, liabilities {liabilities}, \
                     flow-expected {expected} (deposits={}, payouts={})",
                    self.total_deposits(asset),
                    self.total_payouts(asset),
                ),
            });
        }
        Ok(())
    }

    /// Every asset that ever moved.
    #[must_use]
    pub fn tracked_assets(&self) -> Vec<AssetId> {
        let mut assets: HashSet<AssetId> = self.deposits.keys().copied().collect();
        assets.extend(self.payouts.keys().copied());
        let mut assets: Vec<AssetId> = assets.into_iter().collect();
        assets.sort();
        assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealvault_types::Address;

    #[test]
    fn empty_audit_verifies_zero() {
        let audit = CustodyAudit::new();
        assert_eq!(audit.expected_custody(AssetId::Native).unwrap(), 0);
        assert!(audit.verify(AssetId::Native, 0, 0).is_ok());
    }

    #[test]
    fn flows_net_out() {
        let mut audit = CustodyAudit::new();
        audit.record_deposit(AssetId::Native, 1_000);
        audit.record_deposit(AssetId::Native, 500);
        audit.record_payout(AssetId::Native, 300);
        assert_eq!(audit.expected_custody(AssetId::Native).unwrap(), 1_200);
        assert!(audit.verify(AssetId::Native, 1_200, 1_200).is_ok());
    }

    #[test]
    fn mismatched_custody_fails() {
        let mut audit = CustodyAudit::new();
        audit.record_deposit(AssetId::Native, 1_000);
        let err = audit.verify(AssetId::Native, 999, 1_000).unwrap_err();
        assert!(matches!(err, DealvaultError::CustodyInvariantViolation { .. }));
    }

    #[test]
    fn mismatched_liabilities_fail() {
        let mut audit = CustodyAudit::new();
        audit.record_deposit(AssetId::Native, 1_000);
        assert!(audit.verify(AssetId::Native, 1_000, 1_001).is_err());
    }

    #[test]
    fn overdrawn_flow_fails() {
        let mut audit = CustodyAudit::new();
        audit.record_payout(AssetId::Native, 1);
        assert!(audit.expected_custody(AssetId::Native).is_err());
    }

    #[test]
    fn open_total_follows_open_and_close() {
        let mut audit = CustodyAudit::new();
        let token = AssetId::Token(Address::random());
        audit.open_deal(token, 700);
        audit.open_deal(token, 300);
        audit.open_deal(AssetId::Native, 5);
        audit.close_deal(token, 700);
        assert_eq!(audit.open_total(token), 300);
        assert_eq!(audit.open_total(AssetId::Native), 5);
        audit.close_deal(token, 300);
        assert_eq!(audit.open_total(token), 0);
    }

    #[test]
    fn tracked_assets_union() {
        let mut audit = CustodyAudit::new();
        let token = AssetId::Token(Address::random());
        audit.record_deposit(AssetId::Native, 1);
        audit.record_payout(token, 0);
        assert_eq!(audit.tracked_assets(), vec![AssetId::Native, token]);
    }
}
