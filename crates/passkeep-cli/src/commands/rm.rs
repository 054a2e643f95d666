//! Remove command - delete an entry from the vault.
//!
//! Removing an id that does not exist is not an error, so scripts can
//! retry a delete without checking first.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use passkeep_core::store::{EntryId, JsonFileStore};
use passkeep_core::vault::{EntryRepository, Session};

#[derive(ClapArgs)]
pub struct Args {
    /// Entry id as shown by `passkeep ls`
    pub id: EntryId,
}

#[instrument(level = "info", name = "cmd::rm", skip_all, fields(id = %args.id))]
pub fn execute(store: &mut JsonFileStore, session: &Session, args: &Args) -> Result<()> {
    let mut repository = EntryRepository::new(store, session);

    if repository.remove(args.id)? {
        eprintln!("Removed entry {}", args.id);
    } else {
        eprintln!("No entry {} to remove", args.id);
    }
    Ok(())
}
