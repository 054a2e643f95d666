//! Init command - enroll a master password and create the vault file.

use anyhow::Result;
use tracing::instrument;

use passkeep_core::store::JsonFileStore;
use passkeep_core::vault::Authenticator;

use crate::{PasswordOptions, auth, noninteractive_passphrase};

#[instrument(level = "info", name = "cmd::init", skip_all)]
pub fn execute(store: &mut JsonFileStore, password_opts: &PasswordOptions) -> Result<()> {
    let (password, confirm) = match noninteractive_passphrase(password_opts)? {
        // A single non-interactive source has nothing separate to confirm.
        Some(password) => (password.clone(), password),
        None => auth::prompt_new_passphrase()?,
    };

    Authenticator::new(store).enroll(&password, &confirm)?;

    eprintln!("Vault initialized at {}", store.path().display());
    Ok(())
}
