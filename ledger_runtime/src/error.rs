//! Runtime error types.

use thiserror::Error;

use ledger_kernel::{LedgerError, Principal, RecordId};

/// Everything a session can reject a command for.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Mint and withdraw need the issuer capability; `sender` does not hold it.
    #[error("{sender} does not hold the issuer capability")]
    NotIssuer { sender: Principal },

    #[error("{sender} does not own record {record}")]
    NotOwner { sender: Principal, record: RecordId },

    #[error("record {0} is passed twice")]
    DuplicateRecord(RecordId),

    #[error("wallet of {owner} cannot absorb {amount} more")]
    WalletOverflow { owner: Principal, amount: u64 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("malformed command script: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("replay diverged: first run {first}, second run {second}")]
    Nondeterministic { first: String, second: String },
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
