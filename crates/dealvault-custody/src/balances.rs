//! Host account balances.
//!
//! Tracks per-(account, asset) balances for the simulated host. All
//! mutations are atomic: either the full operation succeeds or the
//! balances are unchanged.

use std::collections::HashMap;

use dealvault_types::{Address, AssetId, DealvaultError, Result};

/// Per-(account, asset) balance book.
///
/// The [`Vault`](crate::Vault) keeps every account's holdings here,
/// including its own custody account.
#[derive(Debug, Default)]
pub struct BalanceBook {
    balances: HashMap<(Address, AssetId), u128>,
}

impl BalanceBook {
    /// Create a new empty balance book.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Add funds to an account.
    ///
    /// # Errors
    /// Returns `BalanceOverflow` if the balance would exceed `u128::MAX`.
    pub fn credit(&mut self, owner: Address, asset: AssetId, amount: u128) -> Result<()> {
        let entry = self.balances.entry((owner, asset)).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or(DealvaultError::BalanceOverflow)?;
        Ok(())
    }

    /// Remove funds from an account.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if the balance is smaller than `amount`.
    pub fn debit(&mut self, owner: Address, asset: AssetId, amount: u128) -> Result<()> {
        let available = self.balance(owner, asset);
        if available < amount {
            return Err(DealvaultError::InsufficientFunds {
                asset,
                needed: amount,
                available,
            });
        }
        if let Some(entry) = self.balances.get_mut(&(owner, asset)) {
            *entry -= amount;
        }
        Ok(())
    }

    /// Move funds between two accounts. Nothing changes on failure.
    ///
    /// # Errors
    /// `InsufficientFunds` if `from` cannot cover `amount`,
    /// `BalanceOverflow` if `to` would overflow.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        asset: AssetId,
        amount: u128,
    ) -> Result<()> {
        if from == to {
            // Still enforce the balance check so self-transfers behave.
            let available = self.balance(from, asset);
            if available < amount {
                return Err(DealvaultError::InsufficientFunds {
                    asset,
                    needed: amount,
                    available,
                });
            }
            return Ok(());
        }
        self.balance(to, asset)
            .checked_add(amount)
            .ok_or(DealvaultError::BalanceOverflow)?;
        self.debit(from, asset, amount)?;
        self.credit(to, asset, amount)
    }

    /// Balance of `owner` in `asset` (zero if never touched).
    #[must_use]
    pub fn balance(&self, owner: Address, asset: AssetId) -> u128 {
        self.balances.get(&(owner, asset)).copied().unwrap_or(0)
    }

    /// Total supply of an asset across all accounts.
    #[must_use]
    pub fn total_supply(&self, asset: AssetId) -> u128 {
        self.balances
            .iter()
            .filter(|((_, a), _)| *a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_increases_balance() {
        let mut book = BalanceBook::new();
        let user = Address::random();
        book.credit(user, AssetId::Native, 1000).unwrap();
        assert_eq!(book.balance(user, AssetId::Native), 1000);
    }

    #[test]
    fn debit_insufficient_fails() {
        let mut book = BalanceBook::new();
        let user = Address::random();
        book.credit(user, AssetId::Native, 100).unwrap();
        let err = book.debit(user, AssetId::Native, 200).unwrap_err();
        assert!(matches!(
            err,
            DealvaultError::InsufficientFunds {
                needed: 200,
                available: 100,
                ..
            }
        ));
        // Balance unchanged
        assert_eq!(book.balance(user, AssetId::Native), 100);
    }

    #[test]
    fn transfer_moves_funds() {
        let mut book = BalanceBook::new();
        let a = Address::random();
        let b = Address::random();
        book.credit(a, AssetId::Native, 1000).unwrap();
        book.transfer(a, b, AssetId::Native, 400).unwrap();
        assert_eq!(book.balance(a, AssetId::Native), 600);
        assert_eq!(book.balance(b, AssetId::Native), 400);
        assert_eq!(book.total_supply(AssetId::Native), 1000);
    }

    #[test]
    fn transfer_overflow_leaves_sender_untouched() {
        let mut book = BalanceBook::new();
        let a = Address::random();
        let b = Address::random();
        book.credit(a, AssetId::Native, 10).unwrap();
        book.credit(b, AssetId::Native, u128::MAX).unwrap();
        let err = book.transfer(a, b, AssetId::Native, 10).unwrap_err();
        assert_eq!(err, DealvaultError::BalanceOverflow);
        assert_eq!(book.balance(a, AssetId::Native), 10);
    }

    #[test]
    fn credit_overflow_rejected() {
        let mut book = BalanceBook::new();
        let a = Address::random();
        book.credit(a, AssetId::Native, u128::MAX).unwrap();
        assert!(book.credit(a, AssetId::Native, 1).is_err());
        assert_eq!(book.balance(a, AssetId::Native), u128::MAX);
    }

    #[test]
    fn total_supply_is_per_asset() {
        let mut book = BalanceBook::new();
        let token = AssetId::Token(Address::random());
        let u1 = Address::random();
        let u2 = Address::random();
        book.credit(u1, token, 1000).unwrap();
        book.credit(u2, token, 500).unwrap();
        book.credit(u1, AssetId::Native, 7).unwrap();
        assert_eq!(book.total_supply(token), 1500);
        assert_eq!(book.total_supply(AssetId::Native), 7);
    }

    #[test]
    fn untouched_balance_is_zero() {
        let book = BalanceBook::new();
        assert_eq!(book.balance(Address::random(), AssetId::Native), 0);
    }
}
