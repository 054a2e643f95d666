//! Interactive password prompts.
//!
//! Prompts go to stderr so stdout stays clean for machine-readable
//! output. Non-interactive password sourcing (environment, stdin) lives
//! in `main.rs`; this module is only reached when a terminal is
//! available.

use anyhow::{Context, Result};

/// Prompt for the master password of an existing vault.
///
/// An empty response is passed through unchanged; the authenticator
/// treats it like any other wrong password.
pub fn prompt_passphrase() -> Result<String> {
    eprint!("Master password: ");
    rpassword::read_password().context("Failed to read master password from terminal")
}

/// Prompt twice for a new master password.
///
/// The pair is returned unchecked. Mismatch and empty-password handling
/// belong to the enrollment path, which reports them uniformly for all
/// password sources.
pub fn prompt_new_passphrase() -> Result<(String, String)> {
    eprint!("New master password: ");
    let password = rpassword::read_password().context("Failed to read master password from terminal")?;
    eprint!("Confirm master password: ");
    let confirm = rpassword::read_password().context("Failed to read confirmation from terminal")?;
    Ok((password, confirm))
}

/// Prompt for the secret of a new entry.
pub fn prompt_secret(site: &str) -> Result<String> {
    eprint!("Secret for {site}: ");
    rpassword::read_password().context("Failed to read secret from terminal")
}
