//! The transfer seam between the escrow ledger and the host's assets.
//!
//! The ledger never touches balances directly. Every value movement goes
//! through [`TransferAdapter::deposit`] (into custody) or
//! [`TransferAdapter::payout`] (out of custody), uniformly for the native
//! asset and fungible tokens.
//!
//! Implementations must make each call all-or-nothing: an `Err` means no
//! balance anywhere changed.

use dealvault_types::{Address, AssetId, Result};

/// Uniform deposit/payout over native and fungible assets.
pub trait TransferAdapter {
    /// Move `amount` of `asset` from `payer` into custody.
    ///
    /// `attached_value` is the native value the payer sent along with the
    /// call. A native deposit requires it to equal `amount` exactly; a token
    /// deposit requires it to be zero and pulls `amount` through the payer's
    /// allowance instead.
    ///
    /// # Errors
    /// `ValueMismatch`, `InsufficientFunds`, `InsufficientAllowance`,
    /// `UnknownAsset`, or `TransferRejected` (also when `payer` is custody).
    fn deposit(
        &mut self,
        asset: &AssetId,
        payer: Address,
        amount: u128,
        attached_value: u128,
    ) -> Result<()>;

    /// Move `amount` of `asset` out of custody to `recipient`.
    ///
    /// A rejected native transfer or a token reporting failure (either by
    /// returning `false` or by reverting) is an error.
    ///
    /// # Errors
    /// `InsufficientFunds`, `UnknownAsset`, or `TransferRejected` (also when
    /// `recipient` is custody).
    fn payout(&mut self, asset: &AssetId, recipient: Address, amount: u128) -> Result<()>;

    /// The account that holds escrowed funds. It can never be a deal party.
    fn custody_account(&self) -> Address;

    /// What custody currently holds of `asset`.
    fn custody_balance(&self, asset: &AssetId) -> u128;

    /// Decimal places of `asset`, if known. Only used for display.
    fn decimals(&self, asset: &AssetId) -> Option<u32>;
}
