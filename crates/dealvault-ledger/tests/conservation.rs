//! Randomized value-conservation walk.
//!
//! Drives many deals through random operation sequences (valid and invalid,
//! with random clock jumps and injected transfer failures) and checks after
//! every step that custody matches open deals plus pending fees. At the end,
//! every terminal deal must account for its deposit exactly:
//! `payout + fee + refund == amount`.

use std::collections::HashMap;

use dealvault_custody::{TokenInfo, TransferAdapter, TransferBehavior, Vault};
use dealvault_ledger::{CallContext, CreateEscrow, EscrowLedger, ManualClock};
use dealvault_types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DAY: u64 = 24 * 60 * 60;

struct World {
    ledger: EscrowLedger<Vault, ManualClock>,
    assets: Vec<AssetId>,
    buyers: Vec<Address>,
    sellers: Vec<Address>,
    arbiters: Vec<Address>,
    /// Per-deal running total of what left custody for that deal.
    settled: HashMap<DealId, u128>,
}

impl World {
    fn new(rng: &mut StdRng) -> Self {
        let mut vault = Vault::new(Address::random());
        let usdc = vault.register_token(Address::random(), TokenInfo::usdc());
        let dai = vault.register_token(Address::random(), TokenInfo::new("DAI", 18));
        let assets = vec![AssetId::Native, usdc, dai];

        let buyers: Vec<Address> = (0..4).map(|_| Address::random()).collect();
        for &buyer in &buyers {
            for &asset in &assets {
                vault.mint(asset, buyer, 1_000_000_000_000_000).unwrap();
                if !asset.is_native() {
                    vault.approve(asset, buyer, u128::MAX).unwrap();
                }
            }
        }
        let start = Timestamp(1_700_000_000 + rng.gen_range(0..DAY));
        let ledger =
            EscrowLedger::new(LedgerConfig::default(), vault, ManualClock::new(start)).unwrap();
        Self {
            ledger,
            assets,
            buyers,
            sellers: (0..3).map(|_| Address::random()).collect(),
            arbiters: (0..2).map(|_| Address::random()).collect(),
            settled: HashMap::new(),
        }
    }

    fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> T {
        items[rng.gen_range(0..items.len())]
    }

    fn create(&mut self, rng: &mut StdRng) {
        let buyer = Self::pick(rng, &self.buyers);
        let asset = Self::pick(rng, &self.assets);
        // Occasionally below the minimum.
        let amount = rng.gen_range(900_000..50_000_000_u128);
        let attached = if asset.is_native() { amount } else { 0 };
        let params = CreateEscrow {
            seller: Self::pick(rng, &self.sellers),
            arbiter: Self::pick(rng, &self.arbiters),
            amount,
            asset,
            description: String::new(),
            acceptance_period: rng.gen_range(1..10) * DAY,
            delivery_period: rng.gen_range(1..10) * DAY,
        };
        let _ = self
            .ledger
            .create_escrow(&CallContext::with_value(buyer, attached), params);
    }

    fn step(&mut self, rng: &mut StdRng) {
        if self.ledger.deal_count() == 0 || rng.gen_range(0..5) == 0 {
            self.create(rng);
            return;
        }
        let id = DealId(rng.gen_range(0..self.ledger.deal_count() as u64));
        let deal = self.ledger.get_escrow(id).unwrap().clone();
        let (buyer, seller, arbiter) = (
            CallContext::new(deal.buyer),
            CallContext::new(deal.seller),
            CallContext::new(deal.arbiter),
        );
        // A random caller exercises the authorization guards too.
        let anyone = CallContext::new(Self::pick(
            rng,
            &[deal.buyer, deal.seller, deal.arbiter, Address::random()],
        ));
        let before = self.ledger.adapter().custody_balance(&deal.asset);

        let result = match rng.gen_range(0..12) {
            0 => self.ledger.accept_deal(&seller, id),
            1 => self.ledger.reject_deal(&seller, id),
            2 => self.ledger.claim_refund(&buyer, id),
            3 => self.ledger.mark_delivered(&seller, id, "proof"),
            4 => self.ledger.release(&buyer, id),
            5 => self.ledger.raise_dispute(&buyer, id),
            6 => {
                let winner = if rng.gen_range(0..2) == 0 {
                    deal.buyer
                } else {
                    deal.seller
                };
                self.ledger.resolve_dispute(&arbiter, id, winner)
            }
            7 => self.ledger.claim_auto_release(&seller, id),
            8 => self.ledger.claim_dispute_timeout(&buyer, id),
            9 => self.ledger.request_mutual_cancel(&anyone, id),
            10 => self.ledger.release(&anyone, id),
            _ => self
                .ledger
                .withdraw_fees(&arbiter, deal.asset)
                .map(|_| ()),
        };

        let after = self.ledger.adapter().custody_balance(&deal.asset);
        if result.is_err() {
            assert_eq!(before, after, "rejected call moved value");
        }
        let now_closed = !self.ledger.get_escrow(id).unwrap().is_open();
        if deal.is_open() && now_closed {
            // Whatever left custody plus the fee now owed to the arbiter.
            let fee_owed = match self.ledger.events().last().map(|r| &r.event) {
                Some(EscrowEvent::Released { .. }) => self.ledger.config().fee_for(deal.amount),
                Some(EscrowEvent::DisputeResolved { .. }) => {
                    self.ledger.config().fee_for(deal.amount)
                }
                _ => 0,
            };
            self.settled.insert(id, before - after + fee_owed);
        }
    }

    fn jitter(&mut self, rng: &mut StdRng) {
        match rng.gen_range(0..20) {
            0 => self.ledger.clock().advance(rng.gen_range(0..40) * DAY),
            1..=4 => self.ledger.clock().advance(rng.gen_range(0..DAY)),
            5 => {
                let asset = Self::pick(rng, &self.assets);
                if !asset.is_native() {
                    let behavior = Self::pick(
                        rng,
                        &[
                            TransferBehavior::Standard,
                            TransferBehavior::ReturnsFalse,
                            TransferBehavior::Reverts,
                        ],
                    );
                    self.ledger
                        .adapter_mut()
                        .set_token_behavior(asset, behavior)
                        .unwrap();
                }
            }
            6 => {
                let seller = Self::pick(rng, &self.sellers);
                let rejects = rng.gen_range(0..2) == 0;
                self.ledger.adapter_mut().set_rejects_native(seller, rejects);
            }
            _ => {}
        }
    }

    fn check_custody(&self) {
        for &asset in &self.assets {
            self.ledger.verify_custody(asset).unwrap();
        }
    }
}

fn run_walk(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = World::new(&mut rng);
    for _ in 0..steps {
        world.jitter(&mut rng);
        world.step(&mut rng);
        world.check_custody();
    }

    let mut terminal = 0;
    for deal_idx in 0..world.ledger.deal_count() {
        let id = DealId(deal_idx as u64);
        let deal = world.ledger.get_escrow(id).unwrap();
        if deal.is_open() {
            continue;
        }
        terminal += 1;
        assert_eq!(
            world.settled.get(&id).copied(),
            Some(deal.amount),
            "{id} did not conserve value"
        );
    }
    assert!(terminal > 0, "walk with seed {seed} closed no deals");
    assert_eq!(world.ledger.events().verify_chain(), None);
}

#[test]
fn conservation_holds_under_random_walk() {
    for seed in [1, 7, 42, 2024, 0xDEA1] {
        run_walk(seed, 600);
    }
}

#[test]
fn conservation_holds_on_long_walk() {
    run_walk(0x5EED, 3_000);
}
