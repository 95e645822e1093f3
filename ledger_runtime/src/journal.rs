//! Append-only event journal.
//!
//! Rules:
//!   - Strict append only — no mutation, no deletion, no reordering
//!   - The journal assigns sequences itself: strictly increasing from 1,
//!     no gaps
//!   - In memory; durable storage belongs to the host

use tracing::debug;

use ledger_kernel::{EventEnvelope, EventSink, LedgerEvent};

/// Ordered log of every event a session has emitted.
#[derive(Debug, Default)]
pub struct EventJournal {
    entries: Vec<EventEnvelope>,
    last_sequence: u64,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `event` in the next envelope and append it.
    pub fn record(&mut self, event: LedgerEvent) -> &EventEnvelope {
        let sequence = self.last_sequence + 1;
        debug!(sequence, event_type = event.event_type(), "journal append");
        self.last_sequence = sequence;
        self.entries.push(EventEnvelope::new(sequence, event));
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[EventEnvelope] {
        &self.entries
    }

    /// Entries with a sequence strictly greater than `sequence`.
    pub fn since(&self, sequence: u64) -> &[EventEnvelope] {
        // Sequences are dense from 1, so the index is the sequence itself.
        let start = usize::try_from(sequence).unwrap_or(usize::MAX).min(self.entries.len());
        &self.entries[start..]
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EventSink for EventJournal {
    fn emit(&mut self, event: LedgerEvent) {
        self.record(event);
    }
}
