//! Vault state machine and entry operations.

pub mod authenticator;
pub mod repository;

// Re-export commonly used types
pub use authenticator::{AuthError, Authenticator, Session, VaultStatus};
pub use repository::{EntryRepository, RepositoryError};
