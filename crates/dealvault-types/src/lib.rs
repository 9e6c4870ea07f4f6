//! # dealvault-types
//!
//! Shared types, errors, and configuration for the **Dealvault** escrow ledger.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`DealId`], [`Address`], [`AssetId`], [`Timestamp`]
//! - **Deal model**: [`Deal`], [`DealState`], [`Role`], [`MutualCancel`]
//! - **Events**: [`EscrowEvent`], [`EventRecord`], [`Notification`]
//! - **Configuration**: [`LedgerConfig`], [`AssetMinimum`]
//! - **Errors**: [`DealvaultError`] with `DV_ERR_` prefix codes, [`ErrorKind`]
//! - **Constants**: fee divisor, safety windows, default periods

pub mod config;
pub mod constants;
pub mod deal;
pub mod error;
pub mod event;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use dealvault_types::{Deal, DealState, EscrowEvent, ...};

pub use config::*;
pub use deal::*;
pub use error::*;
pub use event::*;
pub use ids::*;

// Constants are accessed via `dealvault_types::constants::FOO`
// (not re-exported to avoid name collisions).
