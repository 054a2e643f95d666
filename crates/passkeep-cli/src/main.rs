#![deny(unsafe_code)]

mod auth;
mod commands;
mod exit_code;
mod output;

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

use passkeep_core::error::{AuthError, RepositoryError, StorageError};
use passkeep_core::store::JsonFileStore;
use passkeep_core::vault::{Authenticator, Session};

use crate::commands::{add, init, ls, r#gen, rm, show, status};

/// Command-line credential vault
#[derive(Parser)]
#[command(name = "passkeep")]
#[command(author, version)]
#[command(propagate_version = true)]
#[command(after_help = "EXAMPLES:
    # Create a vault (prompts twice for the master password)
    passkeep init

    # Store a credential (pipe master password from a secret manager)
    echo \"$MASTER\" | passkeep --password-stdin add example.com alice

    # Print one secret, suitable for piping
    passkeep show 3

    # Generate a password without touching any vault
    passkeep gen --length 20 --digits --lowercase
")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Vault file to operate on (default: platform data directory)
    #[arg(long, value_name = "FILE", env = "PASSKEEP_VAULT", global = true)]
    vault: Option<PathBuf>,

    /// Master password (insecure, prefer --password-stdin or PASSKEEP_PASSWORD)
    #[arg(long, env = "PASSKEEP_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Read master password from stdin (single line)
    #[arg(long, conflicts_with = "password", global = true)]
    password_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Password options extracted from CLI for vault commands
#[derive(Clone, Default)]
pub struct PasswordOptions {
    pub password: Option<String>,
    pub password_stdin: bool,
}

impl From<&Cli> for PasswordOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            password: cli.password.clone(),
            password_stdin: cli.password_stdin,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    // ============ Entry operations (require the master password) ============

    /// Store a new credential
    Add(add::Args),

    /// List stored entries
    Ls(ls::Args),

    /// Print the secret of one entry
    Show(show::Args),

    /// Remove an entry
    Rm(rm::Args),

    // ============ Standalone commands (no unlock needed) ============

    /// Create a vault by enrolling a master password
    Init,

    /// Show vault location, enrollment state and entry count
    Status(status::Args),

    /// Generate a random password
    Gen(r#gen::Args),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(e) => {
            // Determine appropriate exit code based on error type
            let code = categorize_error(&e);

            // Only print error if not quiet mode (quiet is parsed separately for this)
            let args: Vec<String> = std::env::args().collect();
            let is_quiet = args.iter().any(|a| a == "-q" || a == "--quiet");

            if !is_quiet {
                eprintln!("Error: {e:#}");
            }

            ExitCode::from(code)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity (skip if quiet)
    if !cli.quiet {
        setup_tracing(cli.verbose);
    }

    // Extract password options from global CLI for vault commands
    let password_opts = PasswordOptions::from(&cli);

    // Execute command
    match cli.command {
        // Standalone commands (no unlock needed)
        Commands::Init => {
            let mut store = open_store(cli.vault.as_deref())?;
            init::execute(&mut store, &password_opts)
        }
        Commands::Status(args) => {
            let mut store = open_store(cli.vault.as_deref())?;
            status::execute(&mut store, &args)
        }
        Commands::Gen(args) => r#gen::execute(&args),

        // Entry operations (require unlock)
        Commands::Add(args) => {
            execute_entry_command(cli.vault.as_deref(), &password_opts, &args, add::execute)
        }
        Commands::Ls(args) => {
            execute_entry_command(cli.vault.as_deref(), &password_opts, &args, ls::execute)
        }
        Commands::Show(args) => {
            execute_entry_command(cli.vault.as_deref(), &password_opts, &args, show::execute)
        }
        Commands::Rm(args) => {
            execute_entry_command(cli.vault.as_deref(), &password_opts, &args, rm::execute)
        }
    }
}

/// Execute a command that requires an unlocked vault
fn execute_entry_command<T, F>(
    vault_override: Option<&Path>,
    password_opts: &PasswordOptions,
    args: &T,
    f: F,
) -> Result<()>
where
    F: FnOnce(&mut JsonFileStore, &Session, &T) -> Result<()>,
{
    let mut store = open_store(vault_override)?;
    let passphrase = get_passphrase(password_opts)?;

    let session = Authenticator::new(&mut store)
        .login(&passphrase)
        .context("Failed to unlock vault - check your master password")?;

    f(&mut store, &session, args)
}

/// Open the vault store at the explicit or platform-default location
fn open_store(vault_override: Option<&Path>) -> Result<JsonFileStore> {
    let vault_path = resolve_vault_path(vault_override)?;
    tracing::debug!(vault = %vault_path.display(), "opening vault");

    JsonFileStore::open(&vault_path)
        .with_context(|| format!("Failed to open vault at {}", vault_path.display()))
}

/// Resolve the vault file path: explicit flag or environment first, then
/// the per-user data directory
fn resolve_vault_path(vault_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = vault_override {
        return Ok(path.to_path_buf());
    }

    let dirs = ProjectDirs::from("", "", "passkeep")
        .context("Could not determine a data directory for this platform")?;
    Ok(dirs.data_dir().join("vault.json"))
}

/// Get the master password using the priority chain:
/// 1. --password-stdin
/// 2. --password / PASSKEEP_PASSWORD
/// 3. Interactive prompt
fn get_passphrase(opts: &PasswordOptions) -> Result<String> {
    match noninteractive_passphrase(opts)? {
        Some(password) => Ok(password),
        None => auth::prompt_passphrase(),
    }
}

/// Non-interactive password sources only; `None` means a prompt is needed
pub(crate) fn noninteractive_passphrase(opts: &PasswordOptions) -> Result<Option<String>> {
    if opts.password_stdin {
        read_password_from_stdin().map(Some)
    } else if let Some(ref password) = opts.password {
        Ok(Some(password.clone()))
    } else {
        Ok(None)
    }
}

/// Read password from stdin (first line only)
fn read_password_from_stdin() -> Result<String> {
    // Check if stdin has data (not a TTY)
    if io::stdin().is_terminal() {
        anyhow::bail!(
            "--password-stdin requires the password to be piped in.\n\
             Example: echo \"$SECRET\" | passkeep --password-stdin ls"
        );
    }

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;

    // Trim trailing newline
    let password = password.trim_end_matches('\n').trim_end_matches('\r');

    if password.is_empty() {
        anyhow::bail!("Password from stdin is empty");
    }

    Ok(password.to_string())
}

/// Set up tracing/logging based on verbosity level
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}

/// Categorize an error into an exit code using typed error downcasting
///
/// This approach is more robust than string matching because it doesn't depend
/// on error message wording, which could change between versions.
fn categorize_error(e: &anyhow::Error) -> u8 {
    // Check the error chain for specific error types
    for cause in e.chain() {
        // Authentication and enrollment failures
        if let Some(auth_err) = cause.downcast_ref::<AuthError>() {
            match auth_err {
                AuthError::Authentication => return exit_code::AUTH_FAILED,
                AuthError::NotEnrolled => return exit_code::NOT_FOUND,
                _ => {}
            }
        }

        // Entry lookup and tamper detection
        if let Some(repo_err) = cause.downcast_ref::<RepositoryError>() {
            match repo_err {
                RepositoryError::NotFound(_) => return exit_code::NOT_FOUND,
                RepositoryError::Integrity(_) => return exit_code::VAULT_INVALID,
                _ => {}
            }
        }

        // Vault file problems
        if let Some(storage_err) = cause.downcast_ref::<StorageError>() {
            match storage_err {
                StorageError::Corrupt(_) => return exit_code::VAULT_INVALID,
                StorageError::Io(source) => {
                    if source.kind() == io::ErrorKind::PermissionDenied {
                        return exit_code::PERMISSION_DENIED;
                    }
                }
                _ => {}
            }
        }

        // Generic I/O errors
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::PermissionDenied => return exit_code::PERMISSION_DENIED,
                io::ErrorKind::NotFound => return exit_code::NOT_FOUND,
                _ => {}
            }
        }
    }

    exit_code::GENERAL_ERROR
}
