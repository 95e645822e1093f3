//! AssetLedger v1 — State Construction

use std::collections::BTreeMap;

use crate::domain::{LedgerConstants, LedgerState, LedgerStats};

/// First identifier handed out. Zero is never issued.
pub const FIRST_RECORD_ID: u64 = 1;

/// Create a fresh, empty LedgerState with the given constants.
pub fn create_initial_state(constants: Option<LedgerConstants>) -> LedgerState {
    LedgerState {
        registry: BTreeMap::new(),
        next_id: FIRST_RECORD_ID,
        constants: constants.unwrap_or_default(),
        stats: LedgerStats::default(),
        capability_issued: false,
    }
}
