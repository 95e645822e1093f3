//! AssetLedger v1 — Invariant Checks
//!
//! Returns `Err(InvariantViolation)` on the first failure.
//! A failure here means a transition handler is wrong, not the caller.

use crate::arithmetic::{checked_add, checked_sub};
use crate::domain::{IssuerCapability, LedgerState, RecordStatus};
use crate::error::LedgerError;
use crate::state::FIRST_RECORD_ID;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run all registry and counter checks.
pub fn try_validate_invariants(state: &LedgerState) -> Result<(), LedgerError> {
    check_id_range(state)?;
    check_ids_never_dropped(state)?;
    check_created_count(state)?;
    check_destroyed_count(state)?;
    check_fee_flow(state)?;
    Ok(())
}

/// Capability balance must equal fees accrued minus fees withdrawn.
pub fn try_validate_capability(
    state: &LedgerState,
    capability: &IssuerCapability,
) -> Result<(), LedgerError> {
    let expected = checked_sub(state.stats.fees_accrued, state.stats.fees_withdrawn)?;
    if capability.accrued_balance() != expected {
        return Err(violation(format!(
            "[INVARIANT:capability_balance] balance={} but accrued-withdrawn={}",
            capability.accrued_balance(),
            expected
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

fn check_id_range(state: &LedgerState) -> Result<(), LedgerError> {
    for id in state.registry.keys() {
        if id.0 < FIRST_RECORD_ID || id.0 >= state.next_id {
            return Err(violation(format!(
                "[INVARIANT:id_range] Record {} outside issued range [{}, {})",
                id, FIRST_RECORD_ID, state.next_id
            )));
        }
    }
    Ok(())
}

/// Destroyed ids stay in the registry so they can never be reissued.
fn check_ids_never_dropped(state: &LedgerState) -> Result<(), LedgerError> {
    let issued = checked_sub(state.next_id, FIRST_RECORD_ID)?;
    if state.registry.len() as u64 != issued {
        return Err(violation(format!(
            "[INVARIANT:ids_never_dropped] registry holds {} ids, {} were issued",
            state.registry.len(),
            issued
        )));
    }
    Ok(())
}

fn check_created_count(state: &LedgerState) -> Result<(), LedgerError> {
    let created = checked_add(state.stats.minted, state.stats.combined)?;
    if state.registry.len() as u64 != created {
        return Err(violation(format!(
            "[INVARIANT:created_count] registry holds {} ids, minted+combined={}",
            state.registry.len(),
            created
        )));
    }
    Ok(())
}

fn check_destroyed_count(state: &LedgerState) -> Result<(), LedgerError> {
    let destroyed = state
        .registry
        .values()
        .filter(|s| **s == RecordStatus::Destroyed)
        .count() as u64;
    if destroyed != state.stats.burned {
        return Err(violation(format!(
            "[INVARIANT:destroyed_count] {} destroyed ids, burned={}",
            destroyed, state.stats.burned
        )));
    }
    Ok(())
}

fn check_fee_flow(state: &LedgerState) -> Result<(), LedgerError> {
    if state.stats.fees_withdrawn > state.stats.fees_accrued {
        return Err(violation(format!(
            "[INVARIANT:fee_flow] withdrew {} but only {} accrued",
            state.stats.fees_withdrawn, state.stats.fees_accrued
        )));
    }
    Ok(())
}

fn violation(msg: String) -> LedgerError {
    LedgerError::InvariantViolation(msg)
}
