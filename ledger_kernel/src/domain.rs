//! AssetLedger v1 — Core Domain Types
//!
//! Records and the issuer capability are move-only handles: no `Clone`,
//! no public constructors. Both carry the `LedgerTag` of the ledger that
//! issued them. The registry in `LedgerState` is the authoritative
//! Active/Destroyed status for every identifier.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::currency::Coin;

// ── Identifiers ────────────────────────────────────────────────────

/// Ledger-unique record identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Account address of an owner. Opaque to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-unique identity of one `Ledger` instance.
///
/// Record ids are only unique within a ledger; the tag tells handles of
/// two ledgers apart. Not part of the canonical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedgerTag(u64);

static NEXT_LEDGER_TAG: AtomicU64 = AtomicU64::new(1);

impl LedgerTag {
    pub(crate) fn next() -> Self {
        Self(NEXT_LEDGER_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

// ── Handles ────────────────────────────────────────────────────────

/// A uniquely identified, single-owner asset record.
#[derive(Debug, Serialize)]
pub struct AssetRecord {
    #[serde(skip)]
    ledger: LedgerTag,
    id: RecordId,
    name: String,
    description: String,
    media_reference: String,
}

impl AssetRecord {
    pub(crate) fn new(
        ledger: LedgerTag,
        id: RecordId,
        name: String,
        description: String,
        media_reference: String,
    ) -> Self {
        Self {
            ledger,
            id,
            name,
            description,
            media_reference,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    /// The ledger that issued this record.
    pub fn ledger(&self) -> LedgerTag {
        self.ledger
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn media_reference(&self) -> &str {
        &self.media_reference
    }
}

/// Attributes of a record to be minted and who receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    pub recipient: Principal,
    pub name: String,
    pub description: String,
    pub media_reference: String,
}

/// Singleton authority to mint and withdraw. Holds the accrued fees.
#[derive(Debug)]
pub struct IssuerCapability {
    ledger: LedgerTag,
    pub(crate) balance: Coin,
}

impl IssuerCapability {
    pub(crate) fn new(ledger: LedgerTag) -> Self {
        Self {
            ledger,
            balance: Coin::zero(),
        }
    }

    /// The ledger this capability was issued by.
    pub fn ledger(&self) -> LedgerTag {
        self.ledger
    }

    pub fn accrued_balance(&self) -> u64 {
        self.balance.amount()
    }
}

// ── Registry ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Active,
    Destroyed,
}

/// Fixed parameters of a ledger. Loaded once at bring-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LedgerConstants {
    /// Fee charged per mint, in the smallest currency unit.
    pub price: u64,
    /// Name given to every record produced by combine.
    pub combined_name: String,
    /// Description given to every record produced by combine.
    pub combined_description: String,
}

impl Default for LedgerConstants {
    fn default() -> Self {
        Self {
            price: 1,
            combined_name: "Combined Asset".to_string(),
            combined_description: "Formed by combining two asset records".to_string(),
        }
    }
}

/// Running counters. Cross-checked against the registry by the invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub minted: u64,
    pub combined: u64,
    pub burned: u64,
    pub fees_accrued: u64,
    pub fees_withdrawn: u64,
}

/// Complete ledger state. The capability balance lives on the capability.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerState {
    pub registry: BTreeMap<RecordId, RecordStatus>,
    pub next_id: u64,
    pub constants: LedgerConstants,
    pub stats: LedgerStats,
    pub capability_issued: bool,
}
