//! Error types for the Dealvault escrow ledger.
//!
//! All errors use the `DV_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors (amounts, addresses, assets, parameters)
//! - 2xx: Authorization errors (caller lacks the required role)
//! - 3xx: State errors (operation invalid for the deal's current state)
//! - 4xx: Deadline errors (operation outside its time window)
//! - 5xx: Transfer errors (value movement failed)
//! - 6xx: Fee ledger errors
//! - 9xx: General / internal errors
//!
//! Every error is fatal to the call that raised it: the ledger never leaves a
//! partial effect behind.

use thiserror::Error;

use crate::{Address, AssetId, DealId, DealState, Role, Timestamp};

/// Coarse classification of an error, independent of the specific variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: amount below minimum, bad address, unknown deal.
    Validation,
    /// The caller is not the party the action requires.
    Authorization,
    /// The deal is not in a state that admits the action.
    State,
    /// The action was attempted outside its time window.
    Deadline,
    /// The underlying value movement failed.
    Transfer,
    /// Configuration problems and broken internal invariants.
    Internal,
}

/// Central error enum for all Dealvault operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DealvaultError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// The deposit is smaller than the configured minimum.
    #[error("DV_ERR_100: Amount {amount} below minimum {minimum} for {asset}")]
    AmountBelowMinimum {
        amount: u128,
        minimum: u128,
        asset: AssetId,
    },

    /// An address failed to parse or is not acceptable in this position.
    #[error("DV_ERR_101: Invalid address: {reason}")]
    InvalidAddress { reason: String },

    /// The parties of a new deal are not three distinct, non-zero accounts.
    #[error("DV_ERR_102: Invalid parties: {reason}")]
    InvalidParties { reason: String },

    /// An acceptance or delivery period of zero.
    #[error("DV_ERR_103: Invalid period: {reason}")]
    InvalidPeriod { reason: String },

    /// No deal with this ID exists.
    #[error("DV_ERR_104: Deal not found: {0}")]
    DealNotFound(DealId),

    /// The dispute winner is neither the buyer nor the seller of record.
    #[error("DV_ERR_105: Invalid dispute winner {winner} for {deal_id}")]
    InvalidWinner { deal_id: DealId, winner: Address },

    /// The asset is not registered with the custody adapter.
    #[error("DV_ERR_106: Unknown asset: {0}")]
    UnknownAsset(AssetId),

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// The caller does not hold the role this action requires.
    #[error("DV_ERR_200: Only {required} may perform {action} on {deal_id}")]
    Unauthorized {
        deal_id: DealId,
        required: Role,
        action: &'static str,
    },

    /// The caller is not one of the parties allowed to perform the action.
    #[error("DV_ERR_201: Caller {caller} is not a party to {deal_id}")]
    NotAParty { deal_id: DealId, caller: Address },

    // =================================================================
    // State Errors (3xx)
    // =================================================================
    /// The deal is in the wrong state for this action.
    #[error("DV_ERR_300: {action} invalid for {deal_id} in state {actual}")]
    InvalidState {
        deal_id: DealId,
        action: &'static str,
        actual: DealState,
    },

    /// The transition graph does not admit this move.
    #[error("DV_ERR_301: Illegal transition {from} -> {to}")]
    IllegalTransition { from: DealState, to: DealState },

    /// This party already consented to a mutual cancel.
    #[error("DV_ERR_302: {role} already requested mutual cancel on {deal_id}")]
    MutualCancelAlreadyRequested { deal_id: DealId, role: Role },

    // =================================================================
    // Deadline Errors (4xx)
    // =================================================================
    /// A deadline has already passed.
    #[error("DV_ERR_400: {action} deadline passed for {deal_id} (deadline {deadline}, now {now})")]
    DeadlinePassed {
        deal_id: DealId,
        action: &'static str,
        deadline: Timestamp,
        now: Timestamp,
    },

    /// A safety window has not yet elapsed.
    #[error("DV_ERR_401: {action} not available for {deal_id} until after {opens_after} (now {now})")]
    WindowNotElapsed {
        deal_id: DealId,
        action: &'static str,
        opens_after: Timestamp,
        now: Timestamp,
    },

    // =================================================================
    // Transfer Errors (5xx)
    // =================================================================
    /// The payer's balance does not cover the transfer.
    #[error("DV_ERR_500: Insufficient funds for {asset}: need {needed}, have {available}")]
    InsufficientFunds {
        asset: AssetId,
        needed: u128,
        available: u128,
    },

    /// The payer has not approved custody to pull this much.
    #[error("DV_ERR_501: Insufficient allowance for {asset}: need {needed}, approved {approved}")]
    InsufficientAllowance {
        asset: AssetId,
        needed: u128,
        approved: u128,
    },

    /// Attached native value does not match what the deposit requires.
    #[error("DV_ERR_502: Attached value {attached} does not match required {required}")]
    ValueMismatch { attached: u128, required: u128 },

    /// The token or recipient rejected the transfer.
    #[error("DV_ERR_504: Transfer of {asset} rejected: {reason}")]
    TransferRejected { asset: AssetId, reason: String },

    /// A balance update would overflow.
    #[error("DV_ERR_505: Balance overflow")]
    BalanceOverflow,

    // =================================================================
    // Fee Ledger Errors (6xx)
    // =================================================================
    /// The caller has nothing pending for this asset.
    #[error("DV_ERR_600: No pending fees for {arbiter} in {asset}")]
    NoPendingFees { arbiter: Address, asset: AssetId },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// The custody accounting equality does not hold. Critical alert.
    #[error("DV_ERR_900: Custody invariant violation: {reason}")]
    CustodyInvariantViolation { reason: String },

    /// Configuration error (invalid config file, bad values).
    #[error("DV_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("DV_ERR_902: Serialization error: {0}")]
    Serialization(String),
}

impl DealvaultError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AmountBelowMinimum { .. }
            | Self::InvalidAddress { .. }
            | Self::InvalidParties { .. }
            | Self::InvalidPeriod { .. }
            | Self::DealNotFound(_)
            | Self::InvalidWinner { .. }
            | Self::UnknownAsset(_) => ErrorKind::Validation,
            Self::Unauthorized { .. } | Self::NotAParty { .. } => ErrorKind::Authorization,
            Self::InvalidState { .. }
            | Self::IllegalTransition { .. }
            | Self::MutualCancelAlreadyRequested { .. }
            | Self::NoPendingFees { .. } => ErrorKind::State,
            Self::DeadlinePassed { .. } | Self::WindowNotElapsed { .. } => ErrorKind::Deadline,
            Self::InsufficientFunds { .. }
            | Self::InsufficientAllowance { .. }
            | Self::ValueMismatch { .. }
            | Self::TransferRejected { .. }
            | Self::BalanceOverflow => ErrorKind::Transfer,
            Self::CustodyInvariantViolation { .. }
            | Self::Configuration(_)
            | Self::Serialization(_) => ErrorKind::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, DealvaultError>;

impl From<serde_json::Error> for DealvaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
