//! # dealvault-custody
//!
//! **Custody plane**: uniform value movement for the escrow ledger.
//!
//! ## Architecture
//!
//! The ledger talks to assets only through the [`TransferAdapter`] seam:
//! 1. **BalanceBook**: per-(account, asset) holdings, atomic transfers
//! 2. **Token**: registered fungible tokens with allowances and a transfer behavior
//! 3. **Vault**: the in-memory host; implements [`TransferAdapter`] over the book
//! 4. **amount**: smallest-unit ⇄ human decimal conversion
//!
//! ## Value Flow
//!
//! ```text
//! payer ──deposit(attached value | allowance)──▶ custody ──payout──▶ recipient
//! ```
//!
//! Every adapter call is all-or-nothing: an error leaves all balances untouched.

pub mod adapter;
pub mod amount;
pub mod balances;
pub mod token;
pub mod vault;

pub use adapter::TransferAdapter;
pub use balances::BalanceBook;
pub use token::{Token, TokenInfo, TransferBehavior};
pub use vault::Vault;
