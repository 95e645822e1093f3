//! ledger-runtime — run a JSON command script against a fresh ledger.
//!
//! Prints one JSON line per command result and per emitted event, then
//! the final canonical hash.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use ledger_runtime::command::parse_script;
use ledger_runtime::config::RuntimeConfig;
use ledger_runtime::replay;
use ledger_runtime::session::Session;

#[derive(Parser)]
#[command(name = "ledger-runtime")]
#[command(about = "Run asset ledger command scripts", long_about = None)]
struct Cli {
    /// JSON array of commands
    #[arg(short, long)]
    script: PathBuf,

    /// Config file path
    #[arg(short, long, default_value = "ledger.toml")]
    config: PathBuf,

    /// Replay the script twice more and require identical results
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = RuntimeConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let text = fs::read_to_string(&cli.script)
        .with_context(|| format!("reading script {}", cli.script.display()))?;
    let commands = parse_script(&text).context("parsing script")?;

    let mut session = Session::new(config.clone()).context("starting session")?;
    for (index, command) in commands.iter().enumerate() {
        let before = session.current_sequence();
        match session.apply(command.clone()) {
            Ok(outcome) => println!("{}", json!({ "command": index, "result": outcome })),
            Err(e) => println!("{}", json!({ "command": index, "error": e.to_string() })),
        }
        for envelope in session.journal().since(before) {
            println!("{}", envelope.to_value());
        }
    }

    if cli.verify {
        let replayed = replay::verify_determinism(&config, &commands)?;
        anyhow::ensure!(
            replayed == session.current_hash(),
            "replay hash {} differs from live hash {}",
            replayed,
            session.current_hash()
        );
    }

    println!(
        "{}",
        json!({
            "hash": session.current_hash(),
            "accrued_balance": session.accrued_balance(),
            "active_records": session.ledger().active_count(),
        })
    );
    Ok(())
}
