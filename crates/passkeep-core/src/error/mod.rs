//! Error types for the passkeep core crate.
//!
//! Every public error type, re-exported from one place. Errors keep their
//! kind all the way up: nothing in this crate downgrades a typed failure to
//! a string.

// Re-export error types from submodules
pub use crate::crypto::envelope::{IntegrityError, SealError};
pub use crate::crypto::kdf::KdfError;
pub use crate::store::StorageError;
pub use crate::vault::authenticator::AuthError;
pub use crate::vault::repository::RepositoryError;
