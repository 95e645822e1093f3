//! AssetLedger v1 — Engine
//!
//! Top-level orchestrator. Delegates mutation to transitions,
//! validates via invariants, logs every outcome.
//!
//! Authorization is by possession: mint and withdraw take the
//! `IssuerCapability` by exclusive reference, combine and burn take the
//! records by value. Handles only work on the ledger that issued them.

use tracing::{debug, info, warn};

use crate::currency::Coin;
use crate::domain::{
    AssetRecord, IssuerCapability, LedgerConstants, LedgerState, LedgerTag, MintRequest,
    RecordId, RecordStatus,
};
use crate::error::{LedgerError, Rejected};
use crate::host::{Custody, EventSink, Treasury};
use crate::invariants::{try_validate_capability, try_validate_invariants};
use crate::state::create_initial_state;
use crate::transitions::{apply_burn, apply_combine, apply_mint, apply_withdraw};

/// Stateful ledger wrapping the transition layer.
#[derive(Debug)]
pub struct Ledger {
    tag: LedgerTag,
    state: LedgerState,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConstants::default())
    }
}

impl Ledger {
    pub fn new(constants: LedgerConstants) -> Self {
        Self {
            tag: LedgerTag::next(),
            state: create_initial_state(Some(constants)),
        }
    }

    /// One-time initializer: issue the single `IssuerCapability`, balance 0.
    /// A second call fails with `CapabilityAlreadyIssued`.
    pub fn bring_up(&mut self) -> Result<IssuerCapability, LedgerError> {
        if self.state.capability_issued {
            warn!("bring-up rejected: capability already issued");
            return Err(LedgerError::CapabilityAlreadyIssued);
        }
        self.state.capability_issued = true;
        info!(price = self.state.constants.price, "issuer capability created");
        Ok(IssuerCapability::new(self.tag))
    }

    /// Mint a record for `request.recipient` against `payment`.
    ///
    /// Returns the new id and the change (`payment - price`, possibly zero).
    /// The record itself is handed to the host's `Custody`. A refused mint
    /// returns the whole payment.
    pub fn mint<H>(
        &mut self,
        capability: &mut IssuerCapability,
        host: &mut H,
        request: MintRequest,
        payment: Coin,
    ) -> Result<(RecordId, Coin), Rejected<Coin>>
    where
        H: EventSink + Treasury + Custody,
    {
        let recipient = request.recipient.clone();
        let paid = payment.amount();
        let (id, remainder) =
            apply_mint(&mut self.state, self.tag, capability, host, request, payment)
                .inspect_err(|e| warn!(%recipient, paid, error = %e, "mint rejected"))?;
        self.check(Some(&*capability))?;
        info!(
            record_id = %id,
            %recipient,
            paid,
            change = remainder.amount(),
            accrued = capability.accrued_balance(),
            "minted"
        );
        Ok((id, remainder))
    }

    /// Merge two records into a new one with the fixed combined name and
    /// description. Both sources are destroyed. The result is unowned.
    /// A refused combine returns both sources.
    pub fn combine<S: EventSink>(
        &mut self,
        sink: &mut S,
        a: AssetRecord,
        b: AssetRecord,
        media_reference: impl Into<String>,
    ) -> Result<AssetRecord, Rejected<(AssetRecord, AssetRecord)>> {
        let (a_id, b_id) = (a.id(), b.id());
        let merged = apply_combine(&mut self.state, self.tag, sink, a, b, media_reference.into())
            .inspect_err(|e| warn!(source1 = %a_id, source2 = %b_id, error = %e, "combine rejected"))?;
        self.check(None)?;
        info!(source1 = %a_id, source2 = %b_id, new_id = %merged.id(), "combined");
        Ok(merged)
    }

    /// Destroy a record. Its id never resolves to an active record again.
    pub fn burn<S: EventSink>(
        &mut self,
        sink: &mut S,
        record: AssetRecord,
    ) -> Result<(), Rejected<AssetRecord>> {
        let id = record.id();
        apply_burn(&mut self.state, self.tag, sink, record)
            .inspect_err(|e| warn!(record_id = %id, error = %e, "burn rejected"))?;
        self.check(None)?;
        info!(record_id = %id, "burned");
        Ok(())
    }

    /// Drain every accrued fee from the capability.
    pub fn withdraw<S: EventSink>(
        &mut self,
        capability: &mut IssuerCapability,
        sink: &mut S,
    ) -> Result<Coin, LedgerError> {
        let coin = apply_withdraw(&mut self.state, self.tag, capability, sink)
            .inspect_err(|e| warn!(error = %e, "withdraw rejected"))?;
        self.check(Some(&*capability))?;
        info!(amount = coin.amount(), "fees withdrawn");
        Ok(coin)
    }

    // -- read side --

    pub fn tag(&self) -> LedgerTag {
        self.tag
    }

    /// Status of `id`, or `None` if this ledger never issued it.
    pub fn resolve(&self, id: RecordId) -> Option<RecordStatus> {
        self.state.registry.get(&id).copied()
    }

    pub fn is_active(&self, id: RecordId) -> bool {
        self.resolve(id) == Some(RecordStatus::Active)
    }

    pub fn active_count(&self) -> usize {
        self.state
            .registry
            .values()
            .filter(|s| **s == RecordStatus::Active)
            .count()
    }

    pub fn constants(&self) -> &LedgerConstants {
        &self.state.constants
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    fn check(&self, capability: Option<&IssuerCapability>) -> Result<(), LedgerError> {
        try_validate_invariants(&self.state)?;
        if let Some(cap) = capability {
            try_validate_capability(&self.state, cap)?;
        }
        debug!(next_id = self.state.next_id, "invariants hold");
        Ok(())
    }
}
