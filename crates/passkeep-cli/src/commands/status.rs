//! Status command - report whether a vault exists and how full it is.
//!
//! Never asks for a password: everything it prints is visible in the
//! vault file anyway.

use anyhow::Result;
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;

use passkeep_core::store::{EntryStore, JsonFileStore};
use passkeep_core::vault::{Authenticator, VaultStatus};

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output format for the status command
#[derive(Serialize)]
struct StatusOutput {
    vault: String,
    enrolled: bool,
    entries: usize,
}

#[instrument(level = "info", name = "cmd::status", skip_all)]
pub fn execute(store: &mut JsonFileStore, args: &Args) -> Result<()> {
    let enrolled = Authenticator::new(store).status()? == VaultStatus::Locked;
    let entries = store.entries()?.len();

    if args.json {
        let output = StatusOutput {
            vault: store.path().display().to_string(),
            enrolled,
            entries,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Vault: {}", store.path().display());
    if enrolled {
        println!("Status: initialized");
        println!("Entries: {entries}");
    } else {
        println!("Status: not initialized (run `passkeep init`)");
    }

    Ok(())
}
