//! In-memory host for the kernel: record custody, currency wallets,
//! treasury issuance and the event journal.
//!
//! Custody only ever holds records the ledger considers active; a record
//! leaves custody exactly when it is handed to a consuming operation, and
//! comes back if that operation is refused.
//!
//! Mint payments are not drawn from wallets. They arrive from outside the
//! vault with the command and are totalled in `deposited`, so every unit in
//! a wallet traces back to a deposit or to treasury issuance.

use std::collections::BTreeMap;

use tracing::debug;

use ledger_kernel::{
    AssetRecord, Coin, Custody, EventSink, LedgerEvent, Principal, RecordId, Treasury,
};

use crate::error::SessionError;
use crate::journal::EventJournal;

#[derive(Debug)]
struct Holding {
    owner: Principal,
    record: AssetRecord,
}

#[derive(Debug, Default)]
pub struct Vault {
    custody: BTreeMap<RecordId, Holding>,
    wallets: BTreeMap<Principal, u64>,
    issued: u64,
    deposited: u64,
    journal: EventJournal,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner_of(&self, id: RecordId) -> Option<&Principal> {
        self.custody.get(&id).map(|h| &h.owner)
    }

    pub fn record(&self, id: RecordId) -> Option<&AssetRecord> {
        self.custody.get(&id).map(|h| &h.record)
    }

    /// Records held by `owner`, in id order.
    pub fn holdings_of(&self, owner: &Principal) -> Vec<RecordId> {
        self.custody
            .iter()
            .filter(|(_, h)| &h.owner == owner)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Fail unless `sender` owns `id`.
    pub fn ensure_owner(&self, sender: &Principal, id: RecordId) -> Result<(), SessionError> {
        match self.owner_of(id) {
            Some(owner) if owner == sender => Ok(()),
            _ => Err(SessionError::NotOwner {
                sender: sender.clone(),
                record: id,
            }),
        }
    }

    /// Release a record from custody if `sender` owns it.
    pub fn take(&mut self, sender: &Principal, id: RecordId) -> Result<AssetRecord, SessionError> {
        self.ensure_owner(sender, id)?;
        self.custody
            .remove(&id)
            .map(|h| h.record)
            .ok_or_else(|| SessionError::NotOwner {
                sender: sender.clone(),
                record: id,
            })
    }

    pub fn balance_of(&self, owner: &Principal) -> u64 {
        self.wallets.get(owner).copied().unwrap_or(0)
    }

    /// Fail if crediting `amount` to `owner` would overflow.
    pub fn ensure_creditable(&self, owner: &Principal, amount: u64) -> Result<(), SessionError> {
        self.balance_of(owner)
            .checked_add(amount)
            .map(|_| ())
            .ok_or_else(|| SessionError::WalletOverflow {
                owner: owner.clone(),
                amount,
            })
    }

    /// Deposit a coin into `owner`'s wallet. Caller has run `ensure_creditable`.
    pub fn credit(&mut self, owner: &Principal, coin: Coin) {
        let amount = coin.into_amount();
        if amount == 0 {
            return;
        }
        let wallet = self.wallets.entry(owner.clone()).or_insert(0);
        *wallet = wallet.saturating_add(amount);
        debug!(%owner, amount, balance = *wallet, "wallet credited");
    }

    /// Total currency created by the treasury.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Bring an outside payment into the vault.
    pub fn receive_payment(&mut self, amount: u64) -> Coin {
        self.deposited = self.deposited.saturating_add(amount);
        Coin::new(amount)
    }

    /// Send a refused payment back out.
    pub fn refund(&mut self, coin: Coin) {
        let amount = coin.into_amount();
        self.deposited = self.deposited.saturating_sub(amount);
        debug!(amount, "payment refunded");
    }

    /// Net outside payments kept by the vault.
    pub fn deposited(&self) -> u64 {
        self.deposited
    }

    /// Sum of every wallet.
    pub fn wallet_total(&self) -> u64 {
        self.wallets.values().fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }
}

impl EventSink for Vault {
    fn emit(&mut self, event: LedgerEvent) {
        self.journal.emit(event);
    }
}

impl Treasury for Vault {
    fn mint_coin(&mut self, amount: u64) -> Coin {
        self.issued = self.issued.saturating_add(amount);
        Coin::new(amount)
    }
}

impl Custody for Vault {
    fn transfer(&mut self, record: AssetRecord, recipient: &Principal) {
        debug!(record_id = %record.id(), %recipient, "record transferred");
        self.custody.insert(
            record.id(),
            Holding {
                owner: recipient.clone(),
                record,
            },
        );
    }
}
