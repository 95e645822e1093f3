//! AssetLedger v1 — Error Types
//!
//! Every failure leaves ledger state and the capability untouched.
//! Operations that take handles by value report failure as `Rejected`,
//! which hands the untouched handles back to the caller.

use thiserror::Error;

use crate::domain::RecordId;

/// All possible ledger failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Mint payment is below the configured price.
    #[error("insufficient payment: paid {paid}, price is {price}")]
    InsufficientPayment { paid: u64, price: u64 },

    /// Withdraw called on a capability with nothing accrued.
    #[error("insufficient balance: nothing accrued to withdraw")]
    InsufficientBalance,

    /// The record handle was already burned or consumed by a combine.
    #[error("record {0} is not active")]
    RecordNotActive(RecordId),

    /// The identifier was never issued by this ledger.
    #[error("record {0} was never issued by this ledger")]
    UnknownRecord(RecordId),

    /// The record handle was issued by a different ledger.
    #[error("record {0} belongs to another ledger")]
    ForeignRecord(RecordId),

    /// The capability was issued by a different ledger.
    #[error("issuer capability belongs to another ledger")]
    ForeignCapability,

    /// Bring-up was attempted twice on the same ledger.
    #[error("issuer capability has already been issued for this ledger")]
    CapabilityAlreadyIssued,

    #[error("arithmetic overflow: {lhs} {op} {rhs}")]
    Overflow {
        op: &'static str,
        lhs: u64,
        rhs: u64,
    },

    /// Post-transition state failed a ledger invariant.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Failure of an operation that consumes its inputs.
#[derive(Debug, Error)]
pub enum Rejected<T> {
    /// Nothing changed. The inputs come back unchanged.
    #[error("{error}")]
    Refused { error: LedgerError, inputs: T },

    /// Failed after the inputs were consumed. Only a broken invariant or an
    /// arithmetic fault the handler had already ruled out ends up here.
    #[error(transparent)]
    Aborted(LedgerError),
}

impl<T> Rejected<T> {
    pub(crate) fn refused(error: LedgerError, inputs: T) -> Self {
        Self::Refused { error, inputs }
    }

    pub fn error(&self) -> &LedgerError {
        match self {
            Self::Refused { error, .. } | Self::Aborted(error) => error,
        }
    }

    /// Split into the error and, if the operation was refused, the inputs.
    pub fn into_parts(self) -> (LedgerError, Option<T>) {
        match self {
            Self::Refused { error, inputs } => (error, Some(inputs)),
            Self::Aborted(error) => (error, None),
        }
    }
}

impl<T> From<LedgerError> for Rejected<T> {
    fn from(error: LedgerError) -> Self {
        Self::Aborted(error)
    }
}
