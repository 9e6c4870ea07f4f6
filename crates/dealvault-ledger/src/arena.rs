//! Append-only deal table.
//!
//! Deals live in a `Vec` indexed by [`DealId`]. IDs are handed out in
//! insertion order starting at 0; records are never removed, so every ID
//! ever returned stays resolvable.

use dealvault_types::{Address, Deal, DealId, DealvaultError, Result};

/// Index-addressed arena of every deal ever created.
#[derive(Debug, Default)]
pub struct DealArena {
    deals: Vec<Deal>,
}

impl DealArena {
    #[must_use]
    pub fn new() -> Self {
        Self { deals: Vec::new() }
    }

    /// The ID the next pushed deal will receive.
    #[must_use]
    pub fn next_id(&self) -> DealId {
        DealId(self.deals.len() as u64)
    }

    /// Append a deal. Its `id` is overwritten with the assigned ID.
    pub fn push(&mut self, mut deal: Deal) -> DealId {
        let id = self.next_id();
        deal.id = id;
        self.deals.push(deal);
        id
    }

    /// # Errors
    /// `DealNotFound` if `id` was never assigned.
    pub fn get(&self, id: DealId) -> Result<&Deal> {
        id.index()
            .and_then(|i| self.deals.get(i))
            .ok_or(DealvaultError::DealNotFound(id))
    }

    /// # Errors
    /// `DealNotFound` if `id` was never assigned.
    pub fn get_mut(&mut self, id: DealId) -> Result<&mut Deal> {
        id.index()
            .and_then(|i| self.deals.get_mut(i))
            .ok_or(DealvaultError::DealNotFound(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.deals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deal> {
        self.deals.iter()
    }

    /// Deals in which `addr` is buyer, seller or arbiter, oldest first.
    pub fn involving(&self, addr: Address) -> impl Iterator<Item = &Deal> {
        self.deals.iter().filter(move |d| d.involves(addr))
    }
}
