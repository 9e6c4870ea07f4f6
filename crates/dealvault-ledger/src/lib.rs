//! # dealvault-ledger
//!
//! **Settlement plane**: the escrow state machine, fee accrual, event feed
//! and custody audit.
//!
//! ## Architecture
//!
//! [`EscrowLedger`] receives calls from an external host and:
//! 1. Reads the [`Clock`] once per call
//! 2. Resolves the deal in the [`DealArena`] and checks state, role and deadline guards
//! 3. Moves value through the custody [`TransferAdapter`](dealvault_custody::TransferAdapter)
//! 4. Credits settlement fees to the pull-based [`FeeLedger`]
//! 5. Appends one chained record to the [`EventLog`]
//! 6. Re-checks custody conservation with the [`CustodyAudit`]
//!
//! ## Deal Lifecycle
//!
//! ```text
//! create ─▶ AWAITING_ACCEPTANCE ─accept─▶ AWAITING_DELIVERY ─deliver─▶ DELIVERED
//!                │ reject/refund               │ release / dispute / cancel  │
//!                ▼                             ▼                              ▼
//!             REFUNDED            COMPLETE · DISPUTED · REFUNDED     (same exits)
//! ```

pub mod arena;
pub mod audit;
pub mod clock;
pub mod events;
pub mod fees;
pub mod ledger;

pub use arena::DealArena;
pub use audit::CustodyAudit;
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{EventLog, GENESIS_DIGEST, verify_records};
pub use fees::FeeLedger;
pub use ledger::{CallContext, CreateEscrow, EscrowLedger};
