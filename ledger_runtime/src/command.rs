//! Command and outcome wire types.
//!
//! A command names the principal submitting it and refers to records by
//! id. The session resolves ids to handles through custody, so a command
//! can never present a record its sender does not hold.

use serde::{Deserialize, Serialize};

use ledger_kernel::{Principal, RecordId};

use crate::error::SessionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Mint {
        sender: Principal,
        recipient: Principal,
        name: String,
        #[serde(default)]
        description: String,
        media_reference: String,
        payment: u64,
    },
    Combine {
        sender: Principal,
        record_a: RecordId,
        record_b: RecordId,
        media_reference: String,
    },
    Burn {
        sender: Principal,
        record: RecordId,
    },
    Withdraw {
        sender: Principal,
    },
}

impl Command {
    pub fn sender(&self) -> &Principal {
        match self {
            Command::Mint { sender, .. }
            | Command::Combine { sender, .. }
            | Command::Burn { sender, .. }
            | Command::Withdraw { sender } => sender,
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            Command::Mint { .. } => "mint",
            Command::Combine { .. } => "combine",
            Command::Burn { .. } => "burn",
            Command::Withdraw { .. } => "withdraw",
        }
    }
}

/// Result of a successfully applied command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// `change` was credited to the sender's wallet.
    Minted { record_id: RecordId, change: u64 },
    /// The new record is now owned by the sender.
    Combined { record_id: RecordId },
    Burned { record_id: RecordId },
    /// `amount` was credited to the sender's wallet.
    Withdrawn { amount: u64 },
}

/// Parse a JSON array of commands.
pub fn parse_script(json: &str) -> Result<Vec<Command>, SessionError> {
    Ok(serde_json::from_str(json)?)
}
