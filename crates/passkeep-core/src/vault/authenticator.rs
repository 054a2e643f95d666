//! Master-password enrollment and login.
//!
//! The vault's lifecycle is not tracked with a state flag. It is encoded in
//! what exists: no [`MasterRecord`](crate::store::MasterRecord) persisted
//! means no vault, a persisted record means the vault is locked, and a live
//! [`Session`] value *is* the unlocked state. Dropping the session locks the
//! vault again, and nothing that touches sealed secrets can even be
//! expressed without one - see [`EntryRepository`](super::EntryRepository).
//!
//! # Example
//!
//! ```no_run
//! use passkeep_core::store::JsonFileStore;
//! use passkeep_core::vault::{Authenticator, EntryRepository};
//!
//! let mut store = JsonFileStore::open("vault.json")?;
//! let session = Authenticator::new(&mut store).login("master password")?;
//!
//! let repo = EntryRepository::new(&mut store, &session);
//! for entry in repo.list()? {
//!     println!("{} {} {}", entry.id, entry.site, entry.account);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::crypto::envelope::EnvelopeCipher;
use crate::crypto::kdf::{
    KdfError, derive_cipher_key, enroll_master_password, verify_master_password,
};
use crate::store::{MasterStore, StorageError};

/// Errors that can occur during enrollment or login.
#[derive(Error, Debug)]
pub enum AuthError {
    /// A required input was empty.
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    /// Enrollment password and confirmation differ.
    #[error("master password and confirmation do not match")]
    Mismatch,

    /// A master password is already enrolled; it cannot be replaced.
    ///
    /// Overwriting the master record would orphan every sealed secret, so a
    /// second enrollment is rejected outright.
    #[error("a master password is already enrolled for this vault")]
    AlreadyEnrolled,

    /// Login was attempted before any master password was enrolled.
    #[error("no master password has been enrolled yet")]
    NotEnrolled,

    /// The master password was incorrect.
    #[error("master password verification failed")]
    Authentication,

    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    Kdf(#[from] KdfError),

    /// The storage collaborator failed.
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

/// Observable vault state, for callers that branch before authenticating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultStatus {
    /// No master password enrolled yet.
    NoVault,
    /// Enrolled and awaiting login.
    Locked,
}

/// Proof of a successful login.
///
/// Holds the cipher bound to the key derived from the verified master
/// password. This type intentionally does not implement `Clone`; dropping it
/// is the logout, and the key material is zeroized on drop.
#[derive(Debug)]
pub struct Session {
    cipher: EnvelopeCipher,
}

impl Session {
    pub(crate) fn cipher(&self) -> &EnvelopeCipher {
        &self.cipher
    }
}

/// Enrollment and login over a master store.
#[derive(Debug)]
pub struct Authenticator<'s, S> {
    store: &'s mut S,
}

impl<'s, S: MasterStore> Authenticator<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Report whether a master password has been enrolled.
    ///
    /// # Errors
    ///
    /// - `AuthError::Storage`: the store could not be read
    pub fn status(&self) -> Result<VaultStatus, AuthError> {
        Ok(match self.store.master_record()? {
            Some(_) => VaultStatus::Locked,
            None => VaultStatus::NoVault,
        })
    }

    /// Enroll the master password for a vault that has none yet.
    ///
    /// Validation order: empty inputs first, then the confirmation match,
    /// then the existing-record check - so callers can report the most
    /// actionable problem.
    ///
    /// # Errors
    ///
    /// - `AuthError::Validation`: password or confirmation is empty
    /// - `AuthError::Mismatch`: the two inputs differ
    /// - `AuthError::AlreadyEnrolled`: this vault already has a master record
    /// - `AuthError::Storage`: the store could not be read or written
    pub fn enroll(&mut self, password: &str, confirm: &str) -> Result<(), AuthError> {
        if password.is_empty() || confirm.is_empty() {
            return Err(AuthError::Validation {
                field: "master password",
            });
        }
        if password != confirm {
            return Err(AuthError::Mismatch);
        }
        if self.store.master_record()?.is_some() {
            warn!("enrollment attempted on an already-enrolled vault");
            return Err(AuthError::AlreadyEnrolled);
        }

        let record = enroll_master_password(password)?;
        self.store.put_master_record(&record)?;
        info!("master password enrolled");
        Ok(())
    }

    /// Verify the master password and unlock the vault.
    ///
    /// An empty candidate is not special-cased: it is derived and rejected
    /// like any other wrong password. Failed attempts change nothing; there
    /// is no lockout or attempt counting.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotEnrolled`: no master record exists yet
    /// - `AuthError::Authentication`: the password is wrong
    /// - `AuthError::Storage`: the store could not be read
    pub fn login(&self, password: &str) -> Result<Session, AuthError> {
        let record = self.store.master_record()?.ok_or(AuthError::NotEnrolled)?;

        if !verify_master_password(password, &record) {
            warn!("master password verification failed");
            return Err(AuthError::Authentication);
        }

        debug!("vault unlocked");
        Ok(Session {
            cipher: EnvelopeCipher::new(derive_cipher_key(password)),
        })
    }
}
