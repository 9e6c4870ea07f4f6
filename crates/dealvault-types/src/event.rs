//! Transition events and the notifications derived from them.
//!
//! Every committed transition emits exactly one [`EscrowEvent`]. The ledger
//! wraps it in an [`EventRecord`] (sequence number, timestamp, running
//! digest) so indexers replaying the feed can detect gaps and divergence.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, AssetId, Deal, DealId, Role, Timestamp};

/// What happened to a deal (or to a fee balance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowEvent {
    /// A deal was opened and funded.
    Created {
        deal_id: DealId,
        buyer: Address,
        seller: Address,
        amount: u128,
    },
    /// The seller accepted; delivery clock started.
    Accepted {
        deal_id: DealId,
        delivery_deadline: Timestamp,
    },
    /// The seller marked delivery.
    Delivered { deal_id: DealId },
    /// The seller was paid `payout` (amount minus fee).
    Released { deal_id: DealId, payout: u128 },
    /// The buyer was repaid `amount`.
    Refunded { deal_id: DealId, amount: u128 },
    /// The buyer opened a dispute.
    DisputeOpened { deal_id: DealId },
    /// The arbiter ruled for `winner`.
    DisputeResolved { deal_id: DealId, winner: Address },
    /// One party consented to a mutual cancel.
    MutualCancelRequested { deal_id: DealId, by: Role },
    /// Both parties consented; the buyer was repaid in full.
    MutualCancelCompleted { deal_id: DealId },
    /// An arbiter pulled its accrued fees.
    FeesWithdrawn {
        arbiter: Address,
        asset: AssetId,
        amount: u128,
    },
}

impl EscrowEvent {
    /// The deal this event concerns, if any.
    #[must_use]
    pub fn deal_id(&self) -> Option<DealId> {
        match self {
            Self::Created { deal_id, .. }
            | Self::Accepted { deal_id, .. }
            | Self::Delivered { deal_id }
            | Self::Released { deal_id, .. }
            | Self::Refunded { deal_id, .. }
            | Self::DisputeOpened { deal_id }
            | Self::DisputeResolved { deal_id, .. }
            | Self::MutualCancelRequested { deal_id, .. }
            | Self::MutualCancelCompleted { deal_id } => Some(*deal_id),
            Self::FeesWithdrawn { .. } => None,
        }
    }

    /// Short event name as used by indexers.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "Created",
            Self::Accepted { .. } => "Accepted",
            Self::Delivered { .. } => "Delivered",
            Self::Released { .. } => "Released",
            Self::Refunded { .. } => "Refunded",
            Self::DisputeOpened { .. } => "DisputeOpened",
            Self::DisputeResolved { .. } => "DisputeResolved",
            Self::MutualCancelRequested { .. } => "MutualCancelRequested",
            Self::MutualCancelCompleted { .. } => "MutualCancelCompleted",
            Self::FeesWithdrawn { .. } => "FeesWithdrawn",
        }
    }

    /// The notification the dispatcher should send for this event, given the
    /// deal as it stands after the transition and the caller that caused it.
    ///
    /// Events nobody needs to hear about return `None`.
    #[must_use]
    pub fn notification(&self, deal: &Deal, actor: Address) -> Option<Notification> {
        let other = if actor == deal.buyer {
            deal.seller
        } else {
            deal.buyer
        };
        let (target, title, body) = match self {
            Self::Created { .. } => (
                deal.seller,
                "New Deal Offer",
                "You received a new escrow deal offer.".to_string(),
            ),
            Self::Accepted { .. } => (
                deal.buyer,
                "Deal Accepted",
                "Seller accepted your deal!".to_string(),
            ),
            Self::Delivered { .. } => (
                deal.buyer,
                "Order Delivered",
                "Seller marked order as delivered. Please confirm.".to_string(),
            ),
            Self::Released { .. } if actor == deal.seller => (
                deal.buyer,
                "Funds Auto-Released",
                "The confirmation window passed and funds went to the seller.".to_string(),
            ),
            Self::Released { .. } => (
                deal.seller,
                "Funds Released",
                "Buyer released the funds to you!".to_string(),
            ),
            Self::Refunded { .. } => (
                other,
                "Deal Refunded",
                "The escrowed funds were returned to the buyer.".to_string(),
            ),
            Self::DisputeOpened { .. } => (
                deal.seller,
                "Dispute Opened",
                "Buyer opened a dispute on the deal.".to_string(),
            ),
            Self::DisputeResolved { winner, .. } => {
                let (loser, side) = if *winner == deal.buyer {
                    (deal.seller, "Buyer")
                } else {
                    (deal.buyer, "Seller")
                };
                (
                    loser,
                    "Dispute Resolved",
                    format!("Arbiter resolved dispute in favor of {side}."),
                )
            }
            Self::MutualCancelRequested { .. } => (
                other,
                "Cancellation Requested",
                "The other party proposed cancelling the deal.".to_string(),
            ),
            Self::MutualCancelCompleted { .. } | Self::FeesWithdrawn { .. } => return None,
        };
        Some(Notification {
            target,
            title: title.to_string(),
            body,
            deal_id: deal.id,
        })
    }
}

impl fmt::Display for EscrowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.deal_id() {
            Some(id) => write!(f, "{}({id})", self.kind()),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// One entry of the ledger's append-only event feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the feed, starting at 0. Gap-free.
    pub seq: u64,
    /// Host time of the transition.
    pub at: Timestamp,
    /// The event itself.
    pub event: EscrowEvent,
    /// SHA-256 over the previous digest and this record's content.
    pub digest: [u8; 32],
}

impl EventRecord {
    /// Build the record that follows `prev_digest` in the feed.
    #[must_use]
    pub fn chained(seq: u64, at: Timestamp, event: EscrowEvent, prev_digest: &[u8; 32]) -> Self {
        let digest = Self::compute_digest(seq, at, &event, prev_digest);
        Self {
            seq,
            at,
            event,
            digest,
        }
    }

    /// Recompute the digest of a record from its content.
    ///
    /// Format: `SHA-256("dealvault:event:v1:" || prev || seq || at || json(event))`
    #[must_use]
    pub fn compute_digest(
        seq: u64,
        at: Timestamp,
        event: &EscrowEvent,
        prev_digest: &[u8; 32],
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"dealvault:event:v1:");
        hasher.update(prev_digest);
        hasher.update(seq.to_le_bytes());
        hasher.update(at.0.to_le_bytes());
        // Serializing a plain enum of integers, addresses and strings cannot fail.
        if let Ok(bytes) = serde_json::to_vec(event) {
            hasher.update(bytes);
        }
        hasher.finalize().into()
    }

    /// Whether this record is the valid successor of `prev_digest`.
    #[must_use]
    pub fn verify(&self, prev_digest: &[u8; 32]) -> bool {
        Self::compute_digest(self.seq, self.at, &self.event, prev_digest) == self.digest
    }

    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Payload handed to the external notification dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub target: Address,
    pub title: String,
    pub body: String,
    pub deal_id: DealId,
}
