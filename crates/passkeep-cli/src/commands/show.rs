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

#[instrument(level = "info", name = "cmd::show", skip_all, fields(id = %args.id))]
pub fn execute(store: &mut JsonFileStore, session: &Session, args: &Args) -> Result<()> {
    let repository = EntryRepository::new(store, session);
    let secret = repository.reveal(args.id)?;

    // Secret only, so `passkeep show 3 | pbcopy` works.
    println!("{secret}");
    Ok(())
}
