#![forbid(unsafe_code)]

//! AssetLedger v1 — Kernel
//!
//! Capability-gated asset ledger: mint records against a payment, accrue
//! the fee on the issuer capability, withdraw it, combine or burn records.
//! Ownership, currency issuance and event transport are host concerns,
//! reached through the traits in `host`.

/// Ledger v1. Bound into the canonical hash.
pub const LEDGER_VERSION: u32 = 1;

pub mod arithmetic;
pub mod currency;
pub mod domain;
pub mod engine;
pub mod error;
pub mod events;
pub mod hashing;
pub mod host;
pub mod invariants;
pub mod state;
pub mod transitions;

pub use currency::Coin;
pub use domain::{
    AssetRecord, IssuerCapability, LedgerConstants, LedgerTag, MintRequest, Principal, RecordId,
    RecordStatus,
};
pub use engine::Ledger;
pub use error::{LedgerError, Rejected};
pub use events::{EventEnvelope, LedgerEvent};
pub use host::{Custody, EventSink, Treasury};
