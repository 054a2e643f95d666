//! Process exit codes.
//!
//! Scripts drive `passkeep` non-interactively, so failures map to stable
//! codes instead of one catch-all. Code 2 is left to clap, which uses it
//! for usage errors.

/// The command completed successfully.
pub const SUCCESS: u8 = 0;

/// Unclassified failure.
pub const GENERAL_ERROR: u8 = 1;

/// Master password verification failed.
pub const AUTH_FAILED: u8 = 3;

/// The vault is not initialized, or the requested entry does not exist.
pub const NOT_FOUND: u8 = 4;

/// The vault file is corrupt or an entry failed authentication.
pub const VAULT_INVALID: u8 = 5;

/// The operating system denied access to the vault file.
pub const PERMISSION_DENIED: u8 = 6;
