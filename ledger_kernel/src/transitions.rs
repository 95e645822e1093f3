//! AssetLedger v1 — Centralized Transition Logic
//!
//! ALL state-mutation logic lives here.
//! Each handler validates and computes every checked value first, through
//! borrows only, then mutates. A handler that refuses has touched nothing
//! and hands its by-value inputs back inside `Rejected::Refused`.

use crate::arithmetic::checked_add;
use crate::currency::Coin;
use crate::domain::{
    AssetRecord, IssuerCapability, LedgerState, LedgerTag, MintRequest, RecordId, RecordStatus,
};
use crate::error::{LedgerError, Rejected};
use crate::events::LedgerEvent;
use crate::host::{Custody, EventSink, Treasury};

// ---------------------------------------------------------------------------
// Mint
// ---------------------------------------------------------------------------

struct MintPlan {
    id: RecordId,
    minted: u64,
    fees_accrued: u64,
}

fn check_mint(
    state: &LedgerState,
    ledger: LedgerTag,
    capability: &IssuerCapability,
    payment: &Coin,
) -> Result<MintPlan, LedgerError> {
    ensure_capability(ledger, capability)?;
    let price = state.constants.price;
    let paid = payment.amount();
    if paid < price {
        return Err(LedgerError::InsufficientPayment { paid, price });
    }

    checked_add(capability.accrued_balance(), price)?;
    Ok(MintPlan {
        fees_accrued: checked_add(state.stats.fees_accrued, price)?,
        minted: checked_add(state.stats.minted, 1)?,
        id: peek_next_id(state)?,
    })
}

/// Charge `price` out of `payment`, accrue `price` of freshly minted
/// currency on the capability, create the record and hand it to the
/// recipient. Returns the new id and the change.
pub(crate) fn apply_mint<H>(
    state: &mut LedgerState,
    ledger: LedgerTag,
    capability: &mut IssuerCapability,
    host: &mut H,
    request: MintRequest,
    payment: Coin,
) -> Result<(RecordId, Coin), Rejected<Coin>>
where
    H: EventSink + Treasury + Custody,
{
    let plan = match check_mint(state, ledger, capability, &payment) {
        Ok(plan) => plan,
        Err(error) => return Err(Rejected::refused(error, payment)),
    };
    let price = state.constants.price;
    let id = plan.id;

    // -- mutation starts here --
    let (remainder, charged) = payment.split(price)?;
    // The buyer's price portion is consumed; the fee is fresh currency.
    let _consumed: u64 = charged.into_amount();
    let fee = host.mint_coin(price);
    capability.balance.join(fee)?;

    let record = AssetRecord::new(
        ledger,
        id,
        request.name,
        request.description,
        request.media_reference,
    );
    register(state, id);
    state.stats.minted = plan.minted;
    state.stats.fees_accrued = plan.fees_accrued;

    host.emit(LedgerEvent::Minted {
        record_id: id,
        recipient: request.recipient.clone(),
    });
    host.transfer(record, &request.recipient);

    Ok((id, remainder))
}

// ---------------------------------------------------------------------------
// Combine
// ---------------------------------------------------------------------------

struct CombinePlan {
    id: RecordId,
    combined: u64,
    burned: u64,
}

fn check_combine(
    state: &LedgerState,
    ledger: LedgerTag,
    a: &AssetRecord,
    b: &AssetRecord,
) -> Result<CombinePlan, LedgerError> {
    ensure_consumable(state, ledger, a)?;
    ensure_consumable(state, ledger, b)?;
    if a.id() == b.id() {
        return Err(LedgerError::RecordNotActive(b.id()));
    }
    Ok(CombinePlan {
        combined: checked_add(state.stats.combined, 1)?,
        burned: checked_add(state.stats.burned, 2)?,
        id: peek_next_id(state)?,
    })
}

/// Merge two records into a new unowned one, then destroy both sources
/// (first `a`, then `b`).
pub(crate) fn apply_combine<S: EventSink>(
    state: &mut LedgerState,
    ledger: LedgerTag,
    sink: &mut S,
    a: AssetRecord,
    b: AssetRecord,
    media_reference: String,
) -> Result<AssetRecord, Rejected<(AssetRecord, AssetRecord)>> {
    let plan = match check_combine(state, ledger, &a, &b) {
        Ok(plan) => plan,
        Err(error) => return Err(Rejected::refused(error, (a, b))),
    };
    let id = plan.id;

    // -- mutation starts here --
    let merged = AssetRecord::new(
        ledger,
        id,
        state.constants.combined_name.clone(),
        state.constants.combined_description.clone(),
        media_reference,
    );
    register(state, id);
    state.stats.combined = plan.combined;

    sink.emit(LedgerEvent::Combined {
        source1_id: a.id(),
        source2_id: b.id(),
        new_id: id,
    });
    destroy(state, sink, a);
    destroy(state, sink, b);
    state.stats.burned = plan.burned;

    Ok(merged)
}

// ---------------------------------------------------------------------------
// Burn
// ---------------------------------------------------------------------------

pub(crate) fn apply_burn<S: EventSink>(
    state: &mut LedgerState,
    ledger: LedgerTag,
    sink: &mut S,
    record: AssetRecord,
) -> Result<(), Rejected<AssetRecord>> {
    let checked = ensure_consumable(state, ledger, &record)
        .and_then(|()| checked_add(state.stats.burned, 1));
    let burned = match checked {
        Ok(burned) => burned,
        Err(error) => return Err(Rejected::refused(error, record)),
    };

    destroy(state, sink, record);
    state.stats.burned = burned;
    Ok(())
}

// ---------------------------------------------------------------------------
// Withdraw
// ---------------------------------------------------------------------------

/// Drain the capability balance to zero and return it.
pub(crate) fn apply_withdraw<S: EventSink>(
    state: &mut LedgerState,
    ledger: LedgerTag,
    capability: &mut IssuerCapability,
    sink: &mut S,
) -> Result<Coin, LedgerError> {
    ensure_capability(ledger, capability)?;
    let amount = capability.accrued_balance();
    if amount == 0 {
        return Err(LedgerError::InsufficientBalance);
    }
    let fees_withdrawn = checked_add(state.stats.fees_withdrawn, amount)?;

    let drained = std::mem::replace(&mut capability.balance, Coin::zero());
    state.stats.fees_withdrawn = fees_withdrawn;

    sink.emit(LedgerEvent::BalanceWithdrawn { amount });
    Ok(drained)
}

// ---------------------------------------------------------------------------
// Helpers (private)
// ---------------------------------------------------------------------------

fn ensure_capability(
    ledger: LedgerTag,
    capability: &IssuerCapability,
) -> Result<(), LedgerError> {
    if capability.ledger() != ledger {
        return Err(LedgerError::ForeignCapability);
    }
    Ok(())
}

/// The record was issued here and is still active.
fn ensure_consumable(
    state: &LedgerState,
    ledger: LedgerTag,
    record: &AssetRecord,
) -> Result<(), LedgerError> {
    let id = record.id();
    if record.ledger() != ledger {
        return Err(LedgerError::ForeignRecord(id));
    }
    match state.registry.get(&id) {
        Some(RecordStatus::Active) => Ok(()),
        Some(RecordStatus::Destroyed) => Err(LedgerError::RecordNotActive(id)),
        None => Err(LedgerError::UnknownRecord(id)),
    }
}

/// Identifier the next registration will take. Fails if the id space is spent.
fn peek_next_id(state: &LedgerState) -> Result<RecordId, LedgerError> {
    checked_add(state.next_id, 1)?;
    Ok(RecordId(state.next_id))
}

fn register(state: &mut LedgerState, id: RecordId) {
    state.registry.insert(id, RecordStatus::Active);
    state.next_id = id.0 + 1;
}

/// Emit `Deleted`, then mark the id destroyed. Caller has checked it is active.
fn destroy<S: EventSink>(state: &mut LedgerState, sink: &mut S, record: AssetRecord) {
    let id = record.id();
    sink.emit(LedgerEvent::Deleted { record_id: id });
    state.registry.insert(id, RecordStatus::Destroyed);
}
