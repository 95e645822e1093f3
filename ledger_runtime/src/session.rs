//! Session — the standalone ledger service.
//!
//! A session owns the kernel `Ledger`, the single `IssuerCapability`
//! (held on behalf of the configured issuer) and the in-memory `Vault`.
//! It authorizes each command by possession: mint and withdraw only for
//! the capability holder, combine and burn only for the record owner.
//! A command the ledger refuses returns its payment or records to where
//! they came from.
//!
//! Concurrency: `SharedSession` serializes every command behind a Mutex,
//! so capability read-modify-writes never interleave.

use std::sync::{Mutex, PoisonError};

use tracing::{info, instrument, warn};

use ledger_kernel::hashing::canonical_hash;
use ledger_kernel::{
    Custody, IssuerCapability, Ledger, LedgerError, MintRequest, Principal, RecordId,
    RecordStatus,
};

use crate::command::{Command, Outcome};
use crate::config::RuntimeConfig;
use crate::error::SessionError;
use crate::journal::EventJournal;
use crate::vault::Vault;

pub struct Session {
    ledger: Ledger,
    capability: IssuerCapability,
    issuer: Principal,
    vault: Vault,
}

impl Session {
    /// Bring up a ledger and hand its capability to `config.issuer`.
    pub fn new(config: RuntimeConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let mut ledger = Ledger::new(config.constants);
        let capability = ledger.bring_up()?;
        info!(issuer = %config.issuer, "session started");
        Ok(Self {
            ledger,
            capability,
            issuer: config.issuer,
            vault: Vault::new(),
        })
    }

    /// Authorize and apply one command. A rejected command changes nothing.
    #[instrument(skip_all, fields(op = command.op(), sender = %command.sender()))]
    pub fn apply(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let result = match command {
            Command::Mint {
                sender,
                recipient,
                name,
                description,
                media_reference,
                payment,
            } => {
                let request = MintRequest {
                    recipient,
                    name,
                    description,
                    media_reference,
                };
                self.mint(sender, request, payment)
            }
            Command::Combine {
                sender,
                record_a,
                record_b,
                media_reference,
            } => self.combine(sender, record_a, record_b, media_reference),
            Command::Burn { sender, record } => self.burn(sender, record),
            Command::Withdraw { sender } => self.withdraw(sender),
        };
        if let Err(e) = &result {
            warn!(error = %e, "command rejected");
        }
        result
    }

    fn mint(
        &mut self,
        sender: Principal,
        request: MintRequest,
        payment: u64,
    ) -> Result<Outcome, SessionError> {
        self.ensure_issuer(&sender)?;
        let change = payment.saturating_sub(self.ledger.constants().price);
        self.vault.ensure_creditable(&sender, change)?;

        let coin = self.vault.receive_payment(payment);
        let minted = self
            .ledger
            .mint(&mut self.capability, &mut self.vault, request, coin);
        let (record_id, change) = match minted {
            Ok(minted) => minted,
            Err(rejected) => {
                let (error, payment) = rejected.into_parts();
                if let Some(coin) = payment {
                    self.vault.refund(coin);
                }
                return Err(error.into());
            }
        };
        let change_amount = change.amount();
        self.vault.credit(&sender, change);
        Ok(Outcome::Minted {
            record_id,
            change: change_amount,
        })
    }

    fn combine(
        &mut self,
        sender: Principal,
        record_a: RecordId,
        record_b: RecordId,
        media_reference: String,
    ) -> Result<Outcome, SessionError> {
        if record_a == record_b {
            return Err(SessionError::DuplicateRecord(record_a));
        }
        self.ensure_owner(&sender, record_a)?;
        self.ensure_owner(&sender, record_b)?;

        let a = self.vault.take(&sender, record_a)?;
        let b = match self.vault.take(&sender, record_b) {
            Ok(b) => b,
            Err(e) => {
                self.vault.transfer(a, &sender);
                return Err(e);
            }
        };
        let merged = match self.ledger.combine(&mut self.vault, a, b, media_reference) {
            Ok(merged) => merged,
            Err(rejected) => {
                let (error, sources) = rejected.into_parts();
                if let Some((a, b)) = sources {
                    self.vault.transfer(a, &sender);
                    self.vault.transfer(b, &sender);
                }
                return Err(error.into());
            }
        };
        let record_id = merged.id();
        self.vault.transfer(merged, &sender);
        Ok(Outcome::Combined { record_id })
    }

    fn burn(&mut self, sender: Principal, record: RecordId) -> Result<Outcome, SessionError> {
        self.ensure_owner(&sender, record)?;
        let handle = self.vault.take(&sender, record)?;
        if let Err(rejected) = self.ledger.burn(&mut self.vault, handle) {
            let (error, handle) = rejected.into_parts();
            if let Some(handle) = handle {
                self.vault.transfer(handle, &sender);
            }
            return Err(error.into());
        }
        Ok(Outcome::Burned { record_id: record })
    }

    fn withdraw(&mut self, sender: Principal) -> Result<Outcome, SessionError> {
        self.ensure_issuer(&sender)?;
        self.vault
            .ensure_creditable(&sender, self.capability.accrued_balance())?;

        let coin = self.ledger.withdraw(&mut self.capability, &mut self.vault)?;
        let amount = coin.amount();
        self.vault.credit(&sender, coin);
        Ok(Outcome::Withdrawn { amount })
    }

    fn ensure_issuer(&self, sender: &Principal) -> Result<(), SessionError> {
        if sender != &self.issuer {
            return Err(SessionError::NotIssuer {
                sender: sender.clone(),
            });
        }
        Ok(())
    }

    /// Ownership check that reports destroyed ids as a ledger error.
    fn ensure_owner(&self, sender: &Principal, id: RecordId) -> Result<(), SessionError> {
        if self.ledger.resolve(id) == Some(RecordStatus::Destroyed) {
            return Err(LedgerError::RecordNotActive(id).into());
        }
        self.vault.ensure_owner(sender, id)
    }

    // -- read side --

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn journal(&self) -> &EventJournal {
        self.vault.journal()
    }

    pub fn issuer(&self) -> &Principal {
        &self.issuer
    }

    pub fn accrued_balance(&self) -> u64 {
        self.capability.accrued_balance()
    }

    /// Canonical hash of the ledger state.
    pub fn current_hash(&self) -> String {
        canonical_hash(self.ledger.state())
    }

    pub fn current_sequence(&self) -> u64 {
        self.journal().last_sequence()
    }
}

/// Thread-safe session handle. One command at a time.
pub struct SharedSession {
    inner: Mutex<Session>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    /// Apply a command under the lock.
    pub fn apply(&self, command: Command) -> Result<Outcome, SessionError> {
        let mut session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        session.apply(command)
    }

    /// Run a read-only closure under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    pub fn current_hash(&self) -> String {
        self.with(Session::current_hash)
    }

    pub fn current_sequence(&self) -> u64 {
        self.with(Session::current_sequence)
    }
}
