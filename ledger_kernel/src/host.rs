//! AssetLedger v1 — Host Collaborators
//!
//! The ledger never owns records after handing them out, never creates
//! currency on its own, and never knows where events go. Those concerns
//! belong to the host and are reached only through these traits.

use crate::currency::Coin;
use crate::domain::{AssetRecord, Principal};
use crate::events::LedgerEvent;

/// Synchronous event transport.
pub trait EventSink {
    fn emit(&mut self, event: LedgerEvent);
}

/// Minting authority for fresh currency. Used only by mint.
pub trait Treasury {
    fn mint_coin(&mut self, amount: u64) -> Coin;
}

/// Ownership mechanism: assigns a record to a principal.
pub trait Custody {
    fn transfer(&mut self, record: AssetRecord, recipient: &Principal);
}

impl EventSink for Vec<LedgerEvent> {
    fn emit(&mut self, event: LedgerEvent) {
        self.push(event);
    }
}
