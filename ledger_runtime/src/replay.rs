//! Replay orchestrator — rebuild a session from a command list.
//!
//! Rejected commands are part of the history: they are replayed too and
//! must be rejected again, leaving state untouched both times.

use tracing::info;

use crate::command::{Command, Outcome};
use crate::config::RuntimeConfig;
use crate::error::SessionError;
use crate::session::Session;

/// Per-command result of a replay.
pub type ReplayLog = Vec<Result<Outcome, String>>;

/// Apply `commands` in order to a fresh session.
///
/// Returns `(session, per_command_results, canonical_hash)`.
pub fn rebuild_state(
    config: &RuntimeConfig,
    commands: &[Command],
) -> Result<(Session, ReplayLog, String), SessionError> {
    let mut session = Session::new(config.clone())?;
    let log: ReplayLog = commands
        .iter()
        .map(|cmd| session.apply(cmd.clone()).map_err(|e| e.to_string()))
        .collect();
    let hash = session.current_hash();
    Ok((session, log, hash))
}

/// Rebuild and return only the canonical hash.
pub fn rebuild_hash(config: &RuntimeConfig, commands: &[Command]) -> Result<String, SessionError> {
    let (_, _, hash) = rebuild_state(config, commands)?;
    Ok(hash)
}

/// Replay twice and require identical hashes and per-command results.
pub fn verify_determinism(
    config: &RuntimeConfig,
    commands: &[Command],
) -> Result<String, SessionError> {
    let (_, log1, hash1) = rebuild_state(config, commands)?;
    let (_, log2, hash2) = rebuild_state(config, commands)?;

    if hash1 != hash2 || log1 != log2 {
        return Err(SessionError::Nondeterministic {
            first: hash1,
            second: hash2,
        });
    }
    info!(commands = commands.len(), hash = %hash1, "replay is deterministic");
    Ok(hash1)
}
