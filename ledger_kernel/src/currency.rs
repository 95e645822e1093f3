//! AssetLedger v1 — Currency Value
//!
//! Stand-in for the host's fungible currency. A `Coin` is move-only:
//! value is created by `Coin::new` (funds entering from outside the ledger)
//! or by a `Treasury`, and only ever changes hands by being moved.

use std::fmt;

use crate::arithmetic::{checked_add, checked_sub};
use crate::error::LedgerError;

/// Opaque non-negative amount of currency.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a coin destroys its value"]
pub struct Coin {
    value: u64,
}

impl Coin {
    /// Wrap an amount supplied by the host environment.
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn zero() -> Self {
        Self { value: 0 }
    }

    pub fn amount(&self) -> u64 {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Split off `n` units. Returns `(kept, removed)`.
    pub fn split(self, n: u64) -> Result<(Coin, Coin), LedgerError> {
        let kept = checked_sub(self.value, n)?;
        Ok((Coin { value: kept }, Coin { value: n }))
    }

    /// Merge `other` into this coin.
    pub fn join(&mut self, other: Coin) -> Result<(), LedgerError> {
        self.value = checked_add(self.value, other.value)?;
        Ok(())
    }

    /// Consume the coin and hand its amount back to the host.
    pub fn into_amount(self) -> u64 {
        self.value
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
