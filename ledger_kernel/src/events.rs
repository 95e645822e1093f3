//! AssetLedger v1 — Event Definitions
//!
//! Events are pure data describing a completed transition.
//! They carry no ownership semantics and no transition logic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Principal, RecordId};

/// Schema version for v1 ledger events.
pub const SCHEMA_VERSION: u32 = 1;

/// One notification per completed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    Minted {
        record_id: RecordId,
        recipient: Principal,
    },
    Combined {
        source1_id: RecordId,
        source2_id: RecordId,
        new_id: RecordId,
    },
    Deleted {
        record_id: RecordId,
    },
    BalanceWithdrawn {
        amount: u64,
    },
}

impl LedgerEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::Minted { .. } => "minted",
            LedgerEvent::Combined { .. } => "combined",
            LedgerEvent::Deleted { .. } => "deleted",
            LedgerEvent::BalanceWithdrawn { .. } => "balance_withdrawn",
        }
    }
}

/// Sequenced event as stored by a journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub sequence: u64,
    pub schema_version: u32,
    pub event: LedgerEvent,
}

impl EventEnvelope {
    pub fn new(sequence: u64, event: LedgerEvent) -> Self {
        Self {
            sequence,
            schema_version: SCHEMA_VERSION,
            event,
        }
    }

    /// Flat JSON form: `{"sequence": n, "event_type": ..., <fields>}`.
    pub fn to_value(&self) -> Value {
        let mut obj = serde_json::Map::new();
        obj.insert("sequence".to_string(), Value::from(self.sequence));
        if let Ok(Value::Object(fields)) = serde_json::to_value(&self.event) {
            obj.extend(fields);
        }
        Value::Object(obj)
    }
}
