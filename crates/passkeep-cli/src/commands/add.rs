//! Add command - store a credential in the vault.
//!
//! # Examples
//!
//! ```bash
//! # Prompt for the secret on the terminal
//! passkeep add example.com alice
//!
//! # Generate the secret instead of typing one
//! passkeep add example.com alice --generate --length 20
//! ```

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use passkeep_core::passgen::{self, Charset};
use passkeep_core::store::JsonFileStore;
use passkeep_core::vault::{EntryRepository, Session};

use crate::auth;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Site or service the credential belongs to
    pub site: String,

    /// Account name or login for the site
    pub account: String,

    /// Secret value (insecure, prefer the interactive prompt)
    #[arg(long)]
    pub secret: Option<String>,

    /// Generate the secret instead of prompting for one
    #[arg(long, conflicts_with = "secret")]
    pub generate: bool,

    /// Length of the generated secret
    #[arg(long, default_value_t = passgen::DEFAULT_LENGTH, requires = "generate")]
    pub length: usize,
}

#[instrument(level = "info", name = "cmd::add", skip_all, fields(site = %args.site))]
pub fn execute(store: &mut JsonFileStore, session: &Session, args: &Args) -> Result<()> {
    let mut generated = None;
    let secret = if let Some(ref secret) = args.secret {
        secret.clone()
    } else if args.generate {
        let secret = passgen::generate(args.length, &Charset::all());
        generated = Some(secret.clone());
        secret
    } else {
        auth::prompt_secret(&args.site)?
    };

    let mut repository = EntryRepository::new(store, session);
    let id = repository.add(&args.site, &args.account, &secret)?;

    // A generated secret exists nowhere else, so hand it to the caller.
    if let Some(secret) = generated {
        println!("{secret}");
    }
    eprintln!("Stored entry {id} for {} ({})", args.site, args.account);
    Ok(())
}
