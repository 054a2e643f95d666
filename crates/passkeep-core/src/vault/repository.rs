//! CRUD over sealed credential entries.

use thiserror::Error;
use tracing::{debug, info, instrument};

use super::Session;
use crate::crypto::envelope::{IntegrityError, SealError};
use crate::store::{EntryId, EntryStore, EntrySummary, StorageError};

/// Errors that can occur during entry operations.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A required input was empty.
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    /// No entry exists with the given id.
    #[error("no entry with id {0}")]
    NotFound(EntryId),

    /// The entry's sealed secret failed to open.
    ///
    /// **[INTEGRITY VIOLATION]** The stored token was tampered with, or the
    /// vault file was sealed under a different master password. The entry is
    /// left exactly as it was - never auto-deleted or "repaired".
    #[error("integrity failure: {0}")]
    Integrity(#[from] IntegrityError),

    /// Sealing the secret failed.
    #[error("seal failure: {0}")]
    Seal(#[from] SealError),

    /// The storage collaborator failed.
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

/// Entry operations over a store, on behalf of one unlocked session.
///
/// Constructing one requires a [`Session`], which is the whole point:
/// add/list/reveal/remove cannot be expressed against a locked vault, the
/// compiler enforces it.
#[derive(Debug)]
pub struct EntryRepository<'a, S> {
    store: &'a mut S,
    session: &'a Session,
}

impl<'a, S: EntryStore> EntryRepository<'a, S> {
    pub fn new(store: &'a mut S, session: &'a Session) -> Self {
        Self { store, session }
    }

    /// Seal and store a credential, returning its storage-assigned id.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Validation`: `site`, `account` or `secret` is empty
    /// - `RepositoryError::Seal`: the secret could not be sealed
    /// - `RepositoryError::Storage`: the entry could not be persisted
    #[instrument(level = "debug", skip_all, fields(site = %site))]
    pub fn add(
        &mut self,
        site: &str,
        account: &str,
        secret: &str,
    ) -> Result<EntryId, RepositoryError> {
        for (field, value) in [("site", site), ("account", account), ("secret", secret)] {
            if value.is_empty() {
                return Err(RepositoryError::Validation { field });
            }
        }

        let sealed = self.session.cipher().seal(secret)?;
        let id = self.store.insert_entry(site, account, sealed)?;
        info!(%id, site, "credential entry added");
        Ok(id)
    }

    /// List all entries as id/site/account projections.
    ///
    /// Sealed secrets never travel through this call. Order is whatever the
    /// store yields.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Storage`: the store could not be read
    pub fn list(&self) -> Result<Vec<EntrySummary>, RepositoryError> {
        Ok(self.store.entries()?)
    }

    /// Open and return the secret of one entry.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound`: no entry has this id
    /// - `RepositoryError::Integrity`: the sealed secret failed to open; the
    ///   stored entry is left untouched for inspection
    /// - `RepositoryError::Storage`: the store could not be read
    #[instrument(level = "debug", skip_all, fields(id = %id))]
    pub fn reveal(&self, id: EntryId) -> Result<String, RepositoryError> {
        let entry = self.store.entry(id)?.ok_or(RepositoryError::NotFound(id))?;
        let secret = self.session.cipher().open(&entry.sealed_secret)?;
        debug!(%id, "credential entry revealed");
        Ok(secret)
    }

    /// Remove an entry. Returns whether anything was removed; removing an
    /// unknown id is a successful no-op.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Storage`: the deletion could not be persisted
    #[instrument(level = "debug", skip_all, fields(id = %id))]
    pub fn remove(&mut self, id: EntryId) -> Result<bool, RepositoryError> {
        let removed = self.store.delete_entry(id)?;
        if removed {
            info!(%id, "credential entry removed");
        } else {
            debug!(%id, "remove of unknown entry id ignored");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;
    use crate::crypto::envelope::SealedSecret;
    use crate::store::{EntryStore, MemoryStore};
    use crate::vault::Authenticator;

    fn unlocked_store() -> (MemoryStore, Session) {
        let mut store = MemoryStore::new();
        Authenticator::new(&mut store)
            .enroll("master", "master")
            .unwrap();
        let session = Authenticator::new(&mut store).login("master").unwrap();
        (store, session)
    }

    #[test]
    fn test_add_list_reveal_roundtrip() {
        let (mut store, session) = unlocked_store();
        let mut repo = EntryRepository::new(&mut store, &session);

        let id = repo.add("example.com", "alice", "s3cr3t").unwrap();

        let entries = repo.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].site, "example.com");
        assert_eq!(entries[0].account, "alice");

        assert_eq!(repo.reveal(id).unwrap(), "s3cr3t");
    }

    #[test]
    fn test_add_rejects_empty_fields() {
        let (mut store, session) = unlocked_store();
        let mut repo = EntryRepository::new(&mut store, &session);

        for (site, account, secret, field) in [
            ("", "alice", "pw", "site"),
            ("example.com", "", "pw", "account"),
            ("example.com", "alice", "", "secret"),
        ] {
            match repo.add(site, account, secret) {
                Err(RepositoryError::Validation { field: f }) => assert_eq!(f, field),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_secret_is_not_stored_in_the_clear() {
        let (mut store, session) = unlocked_store();
        let id = EntryRepository::new(&mut store, &session)
            .add("example.com", "alice", "visible-nowhere")
            .unwrap();

        let stored = store.entry(id).unwrap().unwrap();
        assert!(!stored.sealed_secret.as_str().contains("visible-nowhere"));
    }

    #[test]
    fn test_reveal_unknown_id() {
        let (mut store, session) = unlocked_store();
        let repo = EntryRepository::new(&mut store, &session);
        assert!(matches!(
            repo.reveal(EntryId(99)),
            Err(RepositoryError::NotFound(EntryId(99)))
        ));
    }

    #[test]
    fn test_remove_then_reveal_fails() {
        let (mut store, session) = unlocked_store();
        let mut repo = EntryRepository::new(&mut store, &session);

        let id = repo.add("example.com", "alice", "pw").unwrap();
        assert!(repo.remove(id).unwrap());
        assert!(matches!(
            repo.reveal(id),
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_unknown_id_is_a_noop() {
        let (mut store, session) = unlocked_store();
        let mut repo = EntryRepository::new(&mut store, &session);

        let kept = repo.add("example.com", "alice", "pw").unwrap();
        assert!(!repo.remove(EntryId(1234)).unwrap());
        assert_eq!(repo.list().unwrap().len(), 1);
        assert_eq!(repo.reveal(kept).unwrap(), "pw");
    }

    #[test]
    fn test_tampered_entry_surfaces_integrity_and_survives() {
        let (mut store, session) = unlocked_store();
        let id = EntryRepository::new(&mut store, &session)
            .add("example.com", "alice", "pw")
            .unwrap();

        // Corrupt one bit of the stored token, behind the repository's back
        let entry = store.entry(id).unwrap().unwrap();
        let mut raw = URL_SAFE_NO_PAD.decode(entry.sealed_secret.as_str()).unwrap();
        raw[5] ^= 0x01;
        let tampered = SealedSecret::from_token(URL_SAFE_NO_PAD.encode(&raw));
        store.delete_entry(id).unwrap();
        let id = store.insert_entry("example.com", "alice", tampered).unwrap();

        let repo = EntryRepository::new(&mut store, &session);
        assert!(matches!(
            repo.reveal(id),
            Err(RepositoryError::Integrity(_))
        ));
        // The record is still there, untouched
        assert_eq!(repo.list().unwrap().len(), 1);
    }
}
