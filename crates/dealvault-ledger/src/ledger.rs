//! The escrow state machine.
//!
//! [`EscrowLedger`] owns the deal arena, the fee ledger and the event feed,
//! and moves value only through its [`TransferAdapter`]. Every mutating
//! operation follows the same shape:
//!
//! 1. Read the clock once.
//! 2. Evaluate guards in order: existence, state, role, deadline.
//! 3. Perform the single fallible value movement.
//! 4. Commit record updates, fee credit and audit totals, then emit one event.
//!
//! Nothing is written before step 3 succeeds, so a rejected call leaves the
//! ledger exactly as it was.

use dealvault_custody::TransferAdapter;
use dealvault_custody::amount::to_decimal;
use dealvault_types::{
    Address, AssetId, Deal, DealId, DealState, DealvaultError, ErrorKind, EscrowEvent,
    EventRecord, LedgerConfig, MutualCancel, Notification, Result, Role, Timestamp,
};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::arena::DealArena;
use crate::audit::CustodyAudit;
use crate::clock::Clock;
use crate::events::EventLog;
use crate::fees::FeeLedger;

/// Who is calling and how much native value they attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub attached_value: u128,
}

impl CallContext {
    /// A call with no attached value.
    #[must_use]
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            attached_value: 0,
        }
    }

    /// A call carrying `value` of the native asset.
    #[must_use]
    pub fn with_value(caller: Address, value: u128) -> Self {
        Self {
            caller,
            attached_value: value,
        }
    }
}

/// Parameters of [`EscrowLedger::create_escrow`]. The caller is the buyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEscrow {
    pub seller: Address,
    pub arbiter: Address,
    pub amount: u128,
    pub asset: AssetId,
    pub description: String,
    /// Seconds the seller has to accept.
    pub acceptance_period: u64,
    /// Seconds the seller has to deliver, counted from acceptance.
    pub delivery_period: u64,
}

/// One value movement out of custody, planned before it is executed.
#[derive(Debug, Clone, Copy)]
struct Settlement {
    recipient: Address,
    payout: u128,
    fee: u128,
    target: DealState,
}

/// The three-party escrow ledger.
pub struct EscrowLedger<A: TransferAdapter, C: Clock> {
    config: LedgerConfig,
    adapter: A,
    clock: C,
    deals: DealArena,
    fees: FeeLedger,
    events: EventLog,
    audit: CustodyAudit,
}

impl<A: TransferAdapter, C: Clock> EscrowLedger<A, C> {
    /// Create an empty ledger.
    ///
    /// # Errors
    /// `Configuration` if `config` does not validate.
    pub fn new(config: LedgerConfig, adapter: A, clock: C) -> Result<Self> {
        config.validate()?;
        info!(
            engine = dealvault_types::constants::ENGINE_NAME,
            version = dealvault_types::constants::VERSION,
            fee_divisor = %config.fee_divisor,
            min_amount = %config.min_amount,
            "Escrow ledger initialized"
        );
        Ok(Self {
            config,
            adapter,
            clock,
            deals: DealArena::new(),
            fees: FeeLedger::new(),
            events: EventLog::new(),
            audit: CustodyAudit::new(),
        })
    }

    // =================================================================
    // Lifecycle operations
    // =================================================================

    /// Open a deal and pull `amount` of `asset` from the caller into custody.
    ///
    /// # Errors
    /// Validation errors for the amount, parties and periods; transfer errors
    /// from the deposit.
    pub fn create_escrow(&mut self, ctx: &CallContext, params: CreateEscrow) -> Result<DealId> {
        self.run("create_escrow", ctx, |this, now| {
            let minimum = this.config.min_amount_for(&params.asset);
            if params.amount < minimum {
                return Err(DealvaultError::AmountBelowMinimum {
                    amount: params.amount,
                    minimum,
                    asset: params.asset,
                });
            }
            validate_parties(
                ctx.caller,
                params.seller,
                params.arbiter,
                this.adapter.custody_account(),
            )?;
            if params.acceptance_period == 0 {
                return Err(DealvaultError::InvalidPeriod {
                    reason: "acceptance period must be > 0".into(),
                });
            }
            if params.delivery_period == 0 {
                return Err(DealvaultError::InvalidPeriod {
                    reason: "delivery period must be > 0".into(),
                });
            }

            this.adapter
                .deposit(&params.asset, ctx.caller, params.amount, ctx.attached_value)?;

            let deal = Deal {
                id: this.deals.next_id(),
                buyer: ctx.caller,
                seller: params.seller,
                arbiter: params.arbiter,
                asset: params.asset,
                amount: params.amount,
                state: DealState::AwaitingAcceptance,
                acceptance_deadline: now.plus_secs(params.acceptance_period),
                delivery_deadline: Timestamp::ZERO,
                delivery_timestamp: Timestamp::ZERO,
                dispute_timestamp: Timestamp::ZERO,
                delivery_period: params.delivery_period,
                description: params.description,
                proof_of_delivery: String::new(),
                mutual_cancel: MutualCancel::default(),
            };
            let id = this.deals.push(deal);
            this.audit.record_deposit(params.asset, params.amount);
            this.audit.open_deal(params.asset, params.amount);

            info!(
                deal_id = %id,
                buyer = %ctx.caller,
                seller = %params.seller,
                asset = %params.asset,
                amount = %this.format_amount(&params.asset, params.amount),
                "Deal created"
            );
            this.emit(
                now,
                EscrowEvent::Created {
                    deal_id: id,
                    buyer: ctx.caller,
                    seller: params.seller,
                    amount: params.amount,
                },
            );
            this.check_custody(params.asset);
            Ok(id)
        })
    }

    /// Seller accepts; the delivery clock starts.
    ///
    /// # Errors
    /// `DealNotFound`, `InvalidState`, `Unauthorized`, `DeadlinePassed`.
    pub fn accept_deal(&mut self, ctx: &CallContext, id: DealId) -> Result<()> {
        self.run("accept_deal", ctx, |this, now| {
            const ACTION: &str = "accept_deal";
            let deal = this.deals.get(id)?;
            require_state(deal, ACTION, &[DealState::AwaitingAcceptance])?;
            require_role(deal, ctx.caller, Role::Seller, ACTION)?;
            if now > deal.acceptance_deadline {
                return Err(DealvaultError::DeadlinePassed {
                    deal_id: id,
                    action: ACTION,
                    deadline: deal.acceptance_deadline,
                    now,
                });
            }

            let deal = this.deals.get_mut(id)?;
            let delivery_deadline = now.plus_secs(deal.delivery_period);
            deal.transition_to(DealState::AwaitingDelivery)?;
            deal.delivery_deadline = delivery_deadline;

            this.emit(
                now,
                EscrowEvent::Accepted {
                    deal_id: id,
                    delivery_deadline,
                },
            );
            Ok(())
        })
    }

    /// Seller declines the offer; the buyer is repaid in full.
    ///
    /// # Errors
    /// `DealNotFound`, `InvalidState`, `Unauthorized`, transfer errors.
    pub fn reject_deal(&mut self, ctx: &CallContext, id: DealId) -> Result<()> {
        self.run("reject_deal", ctx, |this, now| {
            let deal = this.deals.get(id)?;
            require_state(deal, "reject_deal", &[DealState::AwaitingAcceptance])?;
            require_role(deal, ctx.caller, Role::Seller, "reject_deal")?;
            this.refund_in_full(id, now)
        })
    }

    /// Buyer withdraws an offer the seller has not accepted. Allowed before
    /// and after the acceptance deadline.
    ///
    /// # Errors
    /// `DealNotFound`, `InvalidState`, `Unauthorized`, transfer errors.
    pub fn claim_refund(&mut self, ctx: &CallContext, id: DealId) -> Result<()> {
        self.run("claim_refund", ctx, |this, now| {
            let deal = this.deals.get(id)?;
            require_state(deal, "claim_refund", &[DealState::AwaitingAcceptance])?;
            require_role(deal, ctx.caller, Role::Buyer, "claim_refund")?;
            this.refund_in_full(id, now)
        })
    }

    /// Seller records delivery with free-form proof.
    ///
    /// # Errors
    /// `DealNotFound`, `InvalidState`, `Unauthorized`, `DeadlinePassed`.
    pub fn mark_delivered(
        &mut self,
        ctx: &CallContext,
        id: DealId,
        proof: impl Into<String>,
    ) -> Result<()> {
        self.run("mark_delivered", ctx, |this, now| {
            const ACTION: &str = "mark_delivered";
            let deal = this.deals.get(id)?;
            require_state(deal, ACTION, &[DealState::AwaitingDelivery])?;
            require_role(deal, ctx.caller, Role::Seller, ACTION)?;
            if now > deal.delivery_deadline {
                return Err(DealvaultError::DeadlinePassed {
                    deal_id: id,
                    action: ACTION,
                    deadline: deal.delivery_deadline,
                    now,
                });
            }

            let deal = this.deals.get_mut(id)?;
            deal.transition_to(DealState::Delivered)?;
            deal.delivery_timestamp = now;
            deal.proof_of_delivery = proof.into();

            this.emit(now, EscrowEvent::Delivered { deal_id: id });
            Ok(())
        })
    }

    /// Buyer confirms; the seller is paid `amount - fee`.
    ///
    /// # Errors
    /// `DealNotFound`, `InvalidState`, `Unauthorized`, transfer errors.
    pub fn release(&mut self, ctx: &CallContext, id: DealId) -> Result<()> {
        self.run("release", ctx, |this, now| {
            let deal = this.deals.get(id)?;
            require_state(
                deal,
                "release",
                &[DealState::AwaitingDelivery, DealState::Delivered],
            )?;
            require_role(deal, ctx.caller, Role::Buyer, "release")?;
            let plan = this.pay_seller(deal);
            this.settle(id, plan)?;
            this.emit(
                now,
                EscrowEvent::Released {
                    deal_id: id,
                    payout: plan.payout,
                },
            );
            Ok(())
        })
    }

    /// Buyer contests the deal and freezes it for the arbiter.
    ///
    /// # Errors
    /// `DealNotFound`, `InvalidState`, `Unauthorized`.
    pub fn raise_dispute(&mut self, ctx: &CallContext, id: DealId) -> Result<()> {
        self.run("raise_dispute", ctx, |this, now| {
            let deal = this.deals.get(id)?;
            require_state(
                deal,
                "raise_dispute",
                &[DealState::AwaitingDelivery, DealState::Delivered],
            )?;
            require_role(deal, ctx.caller, Role::Buyer, "raise_dispute")?;

            let deal = this.deals.get_mut(id)?;
            deal.transition_to(DealState::Disputed)?;
            deal.dispute_timestamp = now;

            this.emit(now, EscrowEvent::DisputeOpened { deal_id: id });
            Ok(())
        })
    }

    /// Arbiter rules for `winner`. Either way the arbiter earns the fee and
    /// the winner receives `amount - fee`.
    ///
    /// # Errors
    /// `DealNotFound`, `InvalidState`, `Unauthorized`, `InvalidWinner`,
    /// transfer errors.
    pub fn resolve_dispute(&mut self, ctx: &CallContext, id: DealId, winner: Address) -> Result<()> {
        self.run("resolve_dispute", ctx, |this, now| {
            let deal = this.deals.get(id)?;
            require_state(deal, "resolve_dispute", &[DealState::Disputed])?;
            require_role(deal, ctx.caller, Role::Arbiter, "resolve_dispute")?;
            let plan = match deal.role_of(winner) {
                Some(Role::Seller) => this.pay_seller(deal),
                Some(Role::Buyer) => {
                    let fee = this.config.fee_for(deal.amount);
                    Settlement {
                        recipient: deal.buyer,
                        payout: deal.amount - fee,
                        fee,
                        target: DealState::Refunded,
                    }
                }
                _ => {
                    return Err(DealvaultError::InvalidWinner {
                        deal_id: id,
                        winner,
                    });
                }
            };
            this.settle(id, plan)?;
            this.emit(now, EscrowEvent::DisputeResolved { deal_id: id, winner });
            Ok(())
        })
    }

    /// Seller collects after the buyer stayed silent past the confirmation
    /// window following delivery.
    ///
    /// # Errors
    /// `DealNotFound`, `InvalidState`, `Unauthorized`, `WindowNotElapsed`,
    /// transfer errors.
    pub fn claim_auto_release(&mut self, ctx: &CallContext, id: DealId) -> Result<()> {
        self.run("claim_auto_release", ctx, |this, now| {
            const ACTION: &str = "claim_auto_release";
            let deal = this.deals.get(id)?;
            require_state(deal, ACTION, &[DealState::Delivered])?;
            require_role(deal, ctx.caller, Role::Seller, ACTION)?;
            let opens_after = deal
                .delivery_timestamp
                .plus_secs(this.config.auto_release_window_secs);
            if now <= opens_after {
                return Err(DealvaultError::WindowNotElapsed {
                    deal_id: id,
                    action: ACTION,
                    opens_after,
                    now,
                });
            }
            let plan = this.pay_seller(deal);
            this.settle(id, plan)?;
            this.emit(
                now,
                EscrowEvent::Released {
                    deal_id: id,
                    payout: plan.payout,
                },
            );
            Ok(())
        })
    }

    /// Buyer reclaims everything after the arbiter stayed silent past the
    /// dispute timeout. The arbiter earns nothing.
    ///
    /// # Errors
    /// `DealNotFound`, `InvalidState`, `Unauthorized`, `WindowNotElapsed`,
    /// transfer errors.
    pub fn claim_dispute_timeout(&mut self, ctx: &CallContext, id: DealId) -> Result<()> {
        self.run("claim_dispute_timeout", ctx, |this, now| {
            const ACTION: &str = "claim_dispute_timeout";
            let deal = this.deals.get(id)?;
            require_state(deal, ACTION, &[DealState::Disputed])?;
            require_role(deal, ctx.caller, Role::Buyer, ACTION)?;
            let opens_after = deal
                .dispute_timestamp
                .plus_secs(this.config.dispute_timeout_secs);
            if now <= opens_after {
                return Err(DealvaultError::WindowNotElapsed {
                    deal_id: id,
                    action: ACTION,
                    opens_after,
                    now,
                });
            }
            this.refund_in_full(id, now)
        })
    }

    /// Buyer or seller consents to unwinding an accepted deal. The second
    /// consent refunds the buyer in full with no fee.
    ///
    /// # Errors
    /// `DealNotFound`, `InvalidState`, `NotAParty`,
    /// `MutualCancelAlreadyRequested`, transfer errors.
    pub fn request_mutual_cancel(&mut self, ctx: &CallContext, id: DealId) -> Result<()> {
        self.run("request_mutual_cancel", ctx, |this, now| {
            let deal = this.deals.get(id)?;
            require_state(
                deal,
                "request_mutual_cancel",
                &[DealState::AwaitingDelivery, DealState::Delivered],
            )?;
            let role = match deal.role_of(ctx.caller) {
                Some(role @ (Role::Buyer | Role::Seller)) => role,
                _ => {
                    return Err(DealvaultError::NotAParty {
                        deal_id: id,
                        caller: ctx.caller,
                    });
                }
            };
            if deal.mutual_cancel.requested_by(role) {
                return Err(DealvaultError::MutualCancelAlreadyRequested { deal_id: id, role });
            }

            let mut consent = deal.mutual_cancel;
            match role {
                Role::Buyer => consent.buyer = true,
                _ => consent.seller = true,
            }

            if consent.is_agreed() {
                let plan = Settlement {
                    recipient: deal.buyer,
                    payout: deal.amount,
                    fee: 0,
                    target: DealState::Refunded,
                };
                this.settle(id, plan)?;
                this.deals.get_mut(id)?.mutual_cancel = consent;
                this.emit(now, EscrowEvent::MutualCancelCompleted { deal_id: id });
            } else {
                this.deals.get_mut(id)?.mutual_cancel = consent;
                this.emit(
                    now,
                    EscrowEvent::MutualCancelRequested {
                        deal_id: id,
                        by: role,
                    },
                );
            }
            Ok(())
        })
    }

    /// Pay the caller's whole pending fee balance in `asset` and zero it.
    ///
    /// # Errors
    /// `NoPendingFees`, transfer errors.
    pub fn withdraw_fees(&mut self, ctx: &CallContext, asset: AssetId) -> Result<u128> {
        self.run("withdraw_fees", ctx, |this, now| {
            let arbiter = ctx.caller;
            let amount = this.fees.pending(arbiter, asset);
            if amount == 0 {
                return Err(DealvaultError::NoPendingFees { arbiter, asset });
            }

            this.adapter.payout(&asset, arbiter, amount)?;

            this.fees.take(arbiter, asset)?;
            this.audit.record_payout(asset, amount);
            info!(
                arbiter = %arbiter,
                asset = %asset,
                amount = %this.format_amount(&asset, amount),
                "Fees withdrawn"
            );
            this.emit(
                now,
                EscrowEvent::FeesWithdrawn {
                    arbiter,
                    asset,
                    amount,
                },
            );
            this.check_custody(asset);
            Ok(amount)
        })
    }

    // =================================================================
    // Queries
    // =================================================================

    /// # Errors
    /// `DealNotFound`.
    pub fn get_escrow(&self, id: DealId) -> Result<&Deal> {
        self.deals.get(id)
    }

    #[must_use]
    pub fn get_pending_fees(&self, arbiter: Address, asset: AssetId) -> u128 {
        self.fees.pending(arbiter, asset)
    }

    /// Whether the seller could claim auto-release right now.
    ///
    /// # Errors
    /// `DealNotFound`.
    pub fn can_claim_auto_release(&self, id: DealId) -> Result<bool> {
        let deal = self.deals.get(id)?;
        Ok(deal.state == DealState::Delivered
            && self.clock.now()
                > deal
                    .delivery_timestamp
                    .plus_secs(self.config.auto_release_window_secs))
    }

    /// Whether the buyer could claim the dispute timeout right now.
    ///
    /// # Errors
    /// `DealNotFound`.
    pub fn can_claim_dispute_timeout(&self, id: DealId) -> Result<bool> {
        let deal = self.deals.get(id)?;
        Ok(deal.state == DealState::Disputed
            && self.clock.now()
                > deal
                    .dispute_timestamp
                    .plus_secs(self.config.dispute_timeout_secs))
    }

    #[must_use]
    pub fn deal_count(&self) -> usize {
        self.deals.len()
    }

    /// IDs of deals where `addr` is buyer, seller or arbiter, oldest first.
    #[must_use]
    pub fn deals_for(&self, addr: Address) -> Vec<DealId> {
        self.deals.involving(addr).map(|d| d.id).collect()
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The dispatcher payload for `record`, as caused by `actor`.
    #[must_use]
    pub fn notification_for(&self, record: &EventRecord, actor: Address) -> Option<Notification> {
        let deal = self.deals.get(record.event.deal_id()?).ok()?;
        record.event.notification(deal, actor)
    }

    /// Check that custody of `asset` equals open deal amounts plus pending
    /// fees, and equals net deposits minus payouts.
    ///
    /// Recomputes open amounts from every deal record and also checks the
    /// running open total kept by the audit against that scan.
    ///
    /// # Errors
    /// `CustodyInvariantViolation`.
    pub fn verify_custody(&self, asset: AssetId) -> Result<()> {
        let scanned: u128 = self
            .deals
            .iter()
            .filter(|d| d.asset == asset && d.is_open())
            .map(|d| d.amount)
            .sum();
        let tracked = self.audit.open_total(asset);
        if scanned != tracked {
            return Err(DealvaultError::CustodyInvariantViolation {
                reason: format!("{asset}: open deals sum to {scanned}, audit tracks {tracked}"),
            });
        }
        self.verify_liabilities(asset, scanned)
    }

    /// `amount` in whole units of `asset`, if its decimals are known.
    #[must_use]
    pub fn display_amount(&self, asset: &AssetId, amount: u128) -> Option<Decimal> {
        to_decimal(amount, self.adapter.decimals(asset)?)
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Mutable host access, for funding accounts and injecting failures.
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    // =================================================================
    // Internals
    // =================================================================

    /// Run one operation against a single clock reading, logging rejections.
    fn run<T>(
        &mut self,
        action: &'static str,
        ctx: &CallContext,
        op: impl FnOnce(&mut Self, Timestamp) -> Result<T>,
    ) -> Result<T> {
        let now = self.clock.now();
        let result = op(self, now);
        if let Err(e) = &result {
            if e.kind() == ErrorKind::Transfer {
                warn!(action, caller = %ctx.caller, error = %e, "Transfer failed, operation aborted");
            } else {
                debug!(action, caller = %ctx.caller, error = %e, "Operation rejected");
            }
        }
        result
    }

    /// Standard seller settlement: `amount - fee` to the seller, fee to the arbiter.
    fn pay_seller(&self, deal: &Deal) -> Settlement {
        let fee = self.config.fee_for(deal.amount);
        Settlement {
            recipient: deal.seller,
            payout: deal.amount - fee,
            fee,
            target: DealState::Complete,
        }
    }

    /// Return the full amount to the buyer, no fee, and emit `Refunded`.
    fn refund_in_full(&mut self, id: DealId, now: Timestamp) -> Result<()> {
        let deal = self.deals.get(id)?;
        let plan = Settlement {
            recipient: deal.buyer,
            payout: deal.amount,
            fee: 0,
            target: DealState::Refunded,
        };
        self.settle(id, plan)?;
        self.emit(
            now,
            EscrowEvent::Refunded {
                deal_id: id,
                amount: plan.payout,
            },
        );
        Ok(())
    }

    /// Pay out of custody and close the deal. Guards that can still fail
    /// run before the transfer; only infallible updates follow it.
    fn settle(&mut self, id: DealId, plan: Settlement) -> Result<()> {
        let deal = self.deals.get(id)?;
        let (asset, arbiter, from, amount) = (deal.asset, deal.arbiter, deal.state, deal.amount);
        if !from.can_transition_to(plan.target) {
            return Err(DealvaultError::IllegalTransition {
                from,
                to: plan.target,
            });
        }
        self.fees.check_credit(arbiter, asset, plan.fee)?;

        self.adapter.payout(&asset, plan.recipient, plan.payout)?;

        self.fees.credit(arbiter, asset, plan.fee)?;
        self.audit.record_payout(asset, plan.payout);
        self.audit.close_deal(asset, amount);
        self.deals.get_mut(id)?.transition_to(plan.target)?;
        info!(
            deal_id = %id,
            from = %from,
            to = %plan.target,
            recipient = %plan.recipient,
            payout = %self.format_amount(&asset, plan.payout),
            fee = %plan.fee,
            "Deal settled"
        );
        self.check_custody(asset);
        Ok(())
    }

    fn emit(&mut self, now: Timestamp, event: EscrowEvent) {
        let record = self.events.append(now, event);
        info!(seq = record.seq, at = %record.at, event = %record.event, "Transition committed");
    }

    fn verify_liabilities(&self, asset: AssetId, open: u128) -> Result<()> {
        let liabilities = open.saturating_add(self.fees.total_pending(asset));
        self.audit
            .verify(asset, self.adapter.custody_balance(&asset), liabilities)
    }

    /// Post-commit audit against the running open total, without scanning
    /// deal history. A failure here means value leaked: alert loudly.
    fn check_custody(&self, asset: AssetId) {
        if let Err(e) = self.verify_liabilities(asset, self.audit.open_total(asset)) {
            error!(asset = %asset, error = %e, "CUSTODY INVARIANT VIOLATED");
        }
    }

    fn format_amount(&self, asset: &AssetId, amount: u128) -> String {
        self.display_amount(asset, amount)
            .map_or_else(|| amount.to_string(), |d| d.normalize().to_string())
    }
}

/// Buyer, seller and arbiter must be three distinct, non-zero accounts,
/// none of them the custody account.
fn validate_parties(
    buyer: Address,
    seller: Address,
    arbiter: Address,
    custody: Address,
) -> Result<()> {
    let reason = if buyer.is_zero() {
        "buyer is the zero address"
    } else if seller.is_zero() {
        "seller is the zero address"
    } else if arbiter.is_zero() {
        "arbiter is the zero address"
    } else if buyer == seller {
        "buyer and seller must differ"
    } else if arbiter == buyer || arbiter == seller {
        "arbiter must differ from buyer and seller"
    } else if [buyer, seller, arbiter].contains(&custody) {
        "no party may be the custody account"
    } else {
        return Ok(());
    };
    Err(DealvaultError::InvalidParties {
        reason: reason.into(),
    })
}

fn require_state(deal: &Deal, action: &'static str, allowed: &[DealState]) -> Result<()> {
    if allowed.contains(&deal.state) {
        Ok(())
    } else {
        Err(DealvaultError::InvalidState {
            deal_id: deal.id,
            action,
            actual: deal.state,
        })
    }
}

fn require_role(deal: &Deal, caller: Address, required: Role, action: &'static str) -> Result<()> {
    if deal.party(required) == caller {
        Ok(())
    } else {
        Err(DealvaultError::Unauthorized {
            deal_id: deal.id,
            required,
            action,
        })
    }
}
