//! # Deal: one escrow instance
//!
//! ## State Machine
//!
//! ```text
//!   AWAITING_ACCEPTANCE ──accept──▶ AWAITING_DELIVERY ──markDelivered──▶ DELIVERED
//!          │                          │           │                     │       │
//!          │ reject / claimRefund     │ release   │ raiseDispute        │       │ raiseDispute
//!          ▼                          ▼           ▼        release /    │       ▼
//!      REFUNDED                   COMPLETE     DISPUTED ◀─ autoRelease ─┘   DISPUTED
//!                                               │
//!                     resolve(seller) ──────────┼──────▶ COMPLETE
//!                     resolve(buyer) / timeout ─┴──────▶ REFUNDED
//! ```
//!
//! Mutual cancel moves AWAITING_DELIVERY or DELIVERED straight to REFUNDED.
//!
//! Transitions are **monotonic**: a deal never returns to an earlier state,
//! and COMPLETE / REFUNDED are terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, AssetId, DealId, DealvaultError, Result, Timestamp};

/// Lifecycle state of a deal.
///
/// The discriminants are the wire codes consumed by indexers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum DealState {
    /// Funds deposited; waiting for the seller to accept.
    AwaitingAcceptance = 0,
    /// Seller accepted; delivery clock is running.
    AwaitingDelivery = 1,
    /// Seller marked delivery; buyer confirmation window is running.
    Delivered = 2,
    /// Seller paid. Terminal.
    Complete = 3,
    /// Buyer raised a dispute; waiting for the arbiter.
    Disputed = 4,
    /// Buyer repaid. Terminal.
    Refunded = 5,
}

impl DealState {
    /// Can a deal in this state move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        use DealState::{
            AwaitingAcceptance, AwaitingDelivery, Complete, Delivered, Disputed, Refunded,
        };
        matches!(
            (self, target),
            (AwaitingAcceptance, AwaitingDelivery | Refunded)
                | (AwaitingDelivery, Delivered | Complete | Disputed | Refunded)
                | (Delivered, Complete | Disputed | Refunded)
                | (Disputed, Complete | Refunded)
        )
    }

    /// COMPLETE and REFUNDED never change again.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Refunded)
    }

    /// Numeric code used by indexers.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::AwaitingAcceptance),
            1 => Some(Self::AwaitingDelivery),
            2 => Some(Self::Delivered),
            3 => Some(Self::Complete),
            4 => Some(Self::Disputed),
            5 => Some(Self::Refunded),
            _ => None,
        }
    }
}

impl fmt::Display for DealState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingAcceptance => write!(f, "AWAITING_ACCEPTANCE"),
            Self::AwaitingDelivery => write!(f, "AWAITING_DELIVERY"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Complete => write!(f, "COMPLETE"),
            Self::Disputed => write!(f, "DISPUTED"),
            Self::Refunded => write!(f, "REFUNDED"),
        }
    }
}

/// The three roles on a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Arbiter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buyer => write!(f, "buyer"),
            Self::Seller => write!(f, "seller"),
            Self::Arbiter => write!(f, "arbiter"),
        }
    }
}

/// Consent flags for a mutual cancel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutualCancel {
    pub buyer: bool,
    pub seller: bool,
}

impl MutualCancel {
    #[must_use]
    pub fn requested_by(&self, role: Role) -> bool {
        match role {
            Role::Buyer => self.buyer,
            Role::Seller => self.seller,
            Role::Arbiter => false,
        }
    }

    #[must_use]
    pub fn is_agreed(&self) -> bool {
        self.buyer && self.seller
    }
}

/// One escrow record. Created once by `createEscrow`, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    /// Arena index.
    pub id: DealId,
    /// Depositor; receives refunds.
    pub buyer: Address,
    /// Receives the payout on completion.
    pub seller: Address,
    /// Resolves disputes; earns the settlement fee.
    pub arbiter: Address,
    /// Asset held in custody.
    pub asset: AssetId,
    /// Custodied amount in the asset's smallest unit.
    pub amount: u128,
    /// Current lifecycle state.
    pub state: DealState,
    /// Last moment the seller may accept.
    pub acceptance_deadline: Timestamp,
    /// Last moment the seller may mark delivery. Zero until accepted.
    pub delivery_deadline: Timestamp,
    /// When the seller marked delivery. Zero until then.
    pub delivery_timestamp: Timestamp,
    /// When the buyer raised a dispute. Zero until then.
    pub dispute_timestamp: Timestamp,
    /// Seconds granted for delivery, counted from acceptance.
    pub delivery_period: u64,
    /// Free-form deal terms. Not interpreted.
    pub description: String,
    /// Free-form delivery evidence. Not interpreted.
    pub proof_of_delivery: String,
    /// Mutual cancel consent so far.
    pub mutual_cancel: MutualCancel,
}

impl Deal {
    /// Which role, if any, `addr` holds on this deal.
    ///
    /// Parties are distinct, so the answer is unique.
    #[must_use]
    pub fn role_of(&self, addr: Address) -> Option<Role> {
        if addr == self.buyer {
            Some(Role::Buyer)
        } else if addr == self.seller {
            Some(Role::Seller)
        } else if addr == self.arbiter {
            Some(Role::Arbiter)
        } else {
            None
        }
    }

    /// Address holding `role`.
    #[must_use]
    pub fn party(&self, role: Role) -> Address {
        match role {
            Role::Buyer => self.buyer,
            Role::Seller => self.seller,
            Role::Arbiter => self.arbiter,
        }
    }

    #[must_use]
    pub fn involves(&self, addr: Address) -> bool {
        self.role_of(addr).is_some()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.state.is_terminal()
    }

    /// Move to `target`, enforcing the transition graph.
    ///
    /// # Errors
    /// Returns `IllegalTransition` if the graph has no such edge.
    pub fn transition_to(&mut self, target: DealState) -> Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(DealvaultError::IllegalTransition {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        Ok(())
    }
}

/// Dummy deal for unit tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Deal {
    pub fn dummy(id: DealId, asset: AssetId, amount: u128) -> Self {
        Self {
            id,
            buyer: Address::random(),
            seller: Address::random(),
            arbiter: Address::random(),
            asset,
            amount,
            state: DealState::AwaitingAcceptance,
            acceptance_deadline: Timestamp(1_000),
            delivery_deadline: Timestamp::ZERO,
            delivery_timestamp: Timestamp::ZERO,
            dispute_timestamp: Timestamp::ZERO,
            delivery_period: 100,
            description: "dummy".to_string(),
            proof_of_delivery: String::new(),
            mutual_cancel: MutualCancel::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DealState; 6] = [
        DealState::AwaitingAcceptance,
        DealState::AwaitingDelivery,
        DealState::Delivered,
        DealState::Complete,
        DealState::Disputed,
        DealState::Refunded,
    ];

    #[test]
    fn terminal_states_have_no_exits() {
        for from in [DealState::Complete, DealState::Refunded] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be illegal");
            }
        }
    }

    #[test]
    fn no_state_regresses() {
        assert!(!DealState::AwaitingDelivery.can_transition_to(DealState::AwaitingAcceptance));
        assert!(!DealState::Delivered.can_transition_to(DealState::AwaitingDelivery));
        assert!(!DealState::Disputed.can_transition_to(DealState::Delivered));
        assert!(!DealState::Disputed.can_transition_to(DealState::AwaitingDelivery));
        for s in ALL {
            assert!(!s.can_transition_to(s), "{s} -> {s} must be illegal");
        }
    }

    #[test]
    fn acceptance_cannot_skip_to_settlement() {
        assert!(!DealState::AwaitingAcceptance.can_transition_to(DealState::Complete));
        assert!(!DealState::AwaitingAcceptance.can_transition_to(DealState::Disputed));
        assert!(!DealState::AwaitingAcceptance.can_transition_to(DealState::Delivered));
    }

    #[test]
    fn codes_roundtrip() {
        for s in ALL {
            assert_eq!(DealState::from_code(s.code()), Some(s));
        }
        assert_eq!(DealState::Complete.code(), 3);
        assert_eq!(DealState::from_code(6), None);
    }

    #[test]
    fn transition_to_enforces_graph() {
        let mut deal = Deal::dummy(DealId(0), AssetId::Native, 10);
        deal.transition_to(DealState::AwaitingDelivery).unwrap();
        deal.transition_to(DealState::Complete).unwrap();
        let err = deal.transition_to(DealState::Refunded).unwrap_err();
        assert_eq!(
            err,
            DealvaultError::IllegalTransition {
                from: DealState::Complete,
                to: DealState::Refunded
            }
        );
        assert_eq!(deal.state, DealState::Complete);
    }

    #[test]
    fn role_lookup() {
        let deal = Deal::dummy(DealId(0), AssetId::Native, 10);
        assert_eq!(deal.role_of(deal.buyer), Some(Role::Buyer));
        assert_eq!(deal.role_of(deal.seller), Some(Role::Seller));
        assert_eq!(deal.role_of(deal.arbiter), Some(Role::Arbiter));
        assert_eq!(deal.role_of(Address::ZERO), None);
        assert_eq!(deal.party(Role::Seller), deal.seller);
    }

    #[test]
    fn mutual_cancel_needs_both() {
        let mut mc = MutualCancel {
            buyer: true,
            seller: false,
        };
        assert!(mc.requested_by(Role::Buyer));
        assert!(!mc.is_agreed());
        mc.seller = true;
        assert!(mc.is_agreed());
        assert!(!mc.requested_by(Role::Arbiter));
    }

    #[test]
    fn state_serializes_screaming_snake() {
        let json = serde_json::to_string(&DealState::AwaitingAcceptance).unwrap();
        assert_eq!(json, "\"AWAITING_ACCEPTANCE\"");
    }
}
