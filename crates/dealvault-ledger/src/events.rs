//! Append-only event feed with a running digest.
//!
//! Each committed transition appends one [`EventRecord`]. Records carry a
//! gap-free sequence number and a SHA-256 digest chained over the previous
//! record, so an indexer can resume with [`EventLog::events_since`] and
//! detect divergence by comparing [`EventLog::head_digest`].

use dealvault_types::{EscrowEvent, EventRecord, Result, Timestamp};

/// Digest that precedes the first record.
pub const GENESIS_DIGEST: [u8; 32] = [0u8; 32];

/// The ledger's transition feed.
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append `event` at time `at` and return the new record.
    pub fn append(&mut self, at: Timestamp, event: EscrowEvent) -> &EventRecord {
        let seq = self.records.len() as u64;
        let record = EventRecord::chained(seq, at, event, &self.head_digest());
        tracing::trace!(seq, digest = %record.digest_hex(), "Event appended");
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Digest of the latest record, or [`GENESIS_DIGEST`] when empty.
    #[must_use]
    pub fn head_digest(&self) -> [u8; 32] {
        self.records.last().map_or(GENESIS_DIGEST, |r| r.digest)
    }

    /// Records with `seq >= from`.
    #[must_use]
    pub fn events_since(&self, from: u64) -> &[EventRecord] {
        let start = usize::try_from(from).map_or(self.records.len(), |s| s.min(self.records.len()));
        &self.records[start..]
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    #[must_use]
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recompute the whole chain. Returns the first bad sequence number.
    #[must_use]
    pub fn verify_chain(&self) -> Option<u64> {
        verify_records(&self.records)
    }

    /// JSON lines export for indexers.
    ///
    /// # Errors
    /// `Serialization` if a record cannot be encoded.
    pub fn to_json_lines(&self, from: u64) -> Result<String> {
        let mut out = String::new();
        for record in self.events_since(from) {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Check a replayed feed that starts at genesis: sequence numbers must be
/// gap-free and every digest must chain. Returns the first bad `seq`.
#[must_use]
pub fn verify_records(records: &[EventRecord]) -> Option<u64> {
    let mut prev = GENESIS_DIGEST;
    for (i, record) in records.iter().enumerate() {
        if record.seq != i as u64 || !record.verify(&prev) {
            return Some(i as u64);
        }
        prev = record.digest;
    }
    None
}
