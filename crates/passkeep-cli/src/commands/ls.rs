//! List command - list stored entries without revealing secrets.
//!
//! # Examples
//!
//! ```bash
//! # Human-readable table
//! passkeep ls
//!
//! # Output as JSON for scripting
//! passkeep ls --json | jq '.entries[].site'
//! ```

use anyhow::Result;
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;

use passkeep_core::store::{EntrySummary, JsonFileStore};
use passkeep_core::vault::{EntryRepository, Session};

use crate::output::create_table;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output format for the ls command
#[derive(Serialize)]
struct LsOutput {
    entries: Vec<EntrySummary>,
}

#[instrument(level = "info", name = "cmd::ls", skip_all)]
pub fn execute(store: &mut JsonFileStore, session: &Session, args: &Args) -> Result<()> {
    let repository = EntryRepository::new(store, session);
    let entries = repository.list()?;

    if args.json {
        let output = LsOutput { entries };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if entries.is_empty() {
        eprintln!("The vault has no entries.");
        eprintln!("Use 'passkeep add <site> <account>' to store one.");
        return Ok(());
    }

    print_table(&entries);
    Ok(())
}

fn print_table(entries: &[EntrySummary]) {
    let mut table = create_table();
    table.set_header(vec!["ID", "Site", "Account"]);

    for entry in entries {
        table.add_row(vec![
            entry.id.to_string(),
            entry.site.clone(),
            entry.account.clone(),
        ]);
    }

    println!("{table}");
}
