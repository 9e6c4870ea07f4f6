//! Time source for deadline guards.
//!
//! Every ledger operation reads the clock exactly once and uses that single
//! reading for all of its deadline comparisons.

use std::sync::atomic::{AtomicU64, Ordering};

use dealvault_types::Timestamp;

/// Supplies the host's notion of "now".
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in whole UNIX seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0))
    }
}

/// Manually driven clock for deterministic deadline tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            secs: AtomicU64::new(start.0),
        }
    }

    /// Move time forward by `secs`.
    pub fn advance(&self, secs: u64) {
        // fetch_update never fails when the closure always returns Some.
        let _ = self
            .secs
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |t| {
                Some(t.saturating_add(secs))
            });
    }

    /// Jump to an absolute time. May move backwards.
    pub fn set(&self, at: Timestamp) {
        self.secs.store(at.0, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.secs.load(Ordering::Relaxed))
    }
}
