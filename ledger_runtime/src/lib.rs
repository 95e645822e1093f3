#![forbid(unsafe_code)]

//! AssetLedger v1 — Runtime
//!
//! Runs the ledger kernel as a standalone service: in-memory custody and
//! wallets, an event journal, serialized sessions, deterministic replay.
//!
//! No ledger rules live here — every transition is delegated to the kernel.

pub mod command;
pub mod config;
pub mod error;
pub mod journal;
pub mod replay;
pub mod session;
pub mod vault;
