//! AssetLedger v1 — Canonical Hashing
//!
//! Deterministic canonical serialization + SHA-256 hashing.
//!
//! Rules:
//!   - Records sorted by id (registry is a BTreeMap)
//!   - Stats and constants fields in fixed order
//!   - UTF-8 JSON, no whitespace, no float

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::{LedgerState, RecordStatus};
use crate::LEDGER_VERSION;

/// Canonical serialization of LedgerState to UTF-8 JSON bytes.
/// `ledger_version` is the first field.
pub fn canonical_serialize(state: &LedgerState) -> Vec<u8> {
    // A Value built from maps, strings and integers always serializes.
    build_canonical_value(state).to_string().into_bytes()
}

/// SHA-256 of canonical serialization. Lowercase hex string.
pub fn canonical_hash(state: &LedgerState) -> String {
    let digest = Sha256::digest(canonical_serialize(state));
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Field order: ledger_version, next_id, capability_issued, records,
///              stats, constants
fn build_canonical_value(state: &LedgerState) -> Value {
    // -- records ---
    let records: Vec<Value> = state
        .registry
        .iter()
        .map(|(id, status)| {
            let mut m = Map::new();
            m.insert("id".to_string(), Value::from(id.0));
            m.insert(
                "status".to_string(),
                Value::String(
                    match status {
                        RecordStatus::Active => "active",
                        RecordStatus::Destroyed => "destroyed",
                    }
                    .to_string(),
                ),
            );
            Value::Object(m)
        })
        .collect();

    // -- stats ---
    let s = &state.stats;
    let mut stats = Map::new();
    stats.insert("minted".to_string(), Value::from(s.minted));
    stats.insert("combined".to_string(), Value::from(s.combined));
    stats.insert("burned".to_string(), Value::from(s.burned));
    stats.insert("fees_accrued".to_string(), Value::from(s.fees_accrued));
    stats.insert("fees_withdrawn".to_string(), Value::from(s.fees_withdrawn));

    // -- constants ---
    let c = &state.constants;
    let mut constants = Map::new();
    constants.insert("price".to_string(), Value::from(c.price));
    constants.insert(
        "combined_name".to_string(),
        Value::String(c.combined_name.clone()),
    );
    constants.insert(
        "combined_description".to_string(),
        Value::String(c.combined_description.clone()),
    );

    // -- top-level (strict field order) ---
    let mut root = Map::new();
    root.insert("ledger_version".to_string(), Value::from(LEDGER_VERSION));
    root.insert("next_id".to_string(), Value::from(state.next_id));
    root.insert(
        "capability_issued".to_string(),
        Value::Bool(state.capability_issued),
    );
    root.insert("records".to_string(), Value::Array(records));
    root.insert("stats".to_string(), Value::Object(stats));
    root.insert("constants".to_string(), Value::Object(constants));

    Value::Object(root)
}
