//! Storage contract and reference stores.
//!
//! The vault engine owns no I/O of its own: everything durable goes through
//! the [`MasterStore`] and [`EntryStore`] traits. Two reference
//! implementations ship in-tree - [`JsonFileStore`] for real use and
//! [`MemoryStore`] for tests and embedding. Both are constructed explicitly
//! by the process entry point; nothing runs at import time.
//!
//! Stores persist only non-secret material: the master verifier and salt,
//! plaintext site/account labels, and opaque sealed tokens.

pub mod json;
pub mod memory;

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;
use thiserror::Error;

use crate::crypto::envelope::SealedSecret;

// Re-export commonly used types
pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// Errors raised by storage collaborators.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying I/O failure (disk full, permissions, ...).
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document could not be parsed.
    #[error("store document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A master record is already present; it is write-once.
    #[error("a master record is already present")]
    MasterRecordExists,
}

/// The singleton master-password record.
///
/// Holds everything needed to *verify* the master password and nothing that
/// would help decrypt entries: the PBKDF2 verifier and its salt. Written
/// exactly once at enrollment and immutable afterwards.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterRecord {
    /// Derived authentication verifier.
    #[serde_as(as = "Base64")]
    pub auth_hash: Vec<u8>,

    /// Per-vault random salt for the verifier derivation.
    #[serde_as(as = "Base64")]
    pub salt: Vec<u8>,
}

/// Stable identifier of a credential entry, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(EntryId)
    }
}

/// A credential entry as persisted: plaintext labels, sealed secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: EntryId,
    pub site: String,
    pub account: String,
    pub sealed_secret: SealedSecret,
}

/// The listing projection of an entry. Never carries the sealed secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: EntryId,
    pub site: String,
    pub account: String,
}

/// Persistence surface for the singleton [`MasterRecord`].
pub trait MasterStore {
    /// Load the master record, if one has been enrolled.
    fn master_record(&self) -> Result<Option<MasterRecord>, StorageError>;

    /// Store the master record.
    ///
    /// The record is write-once: implementations must reject a second write
    /// with [`StorageError::MasterRecordExists`] rather than overwrite.
    fn put_master_record(&mut self, record: &MasterRecord) -> Result<(), StorageError>;
}

/// Persistence surface for credential entries.
pub trait EntryStore {
    /// Insert an entry, assigning it a fresh id that is never reused within
    /// this store, and return that id.
    fn insert_entry(
        &mut self,
        site: &str,
        account: &str,
        sealed_secret: SealedSecret,
    ) -> Result<EntryId, StorageError>;

    /// All entries as listing projections. Order is unspecified; the
    /// reference stores happen to yield insertion order.
    fn entries(&self) -> Result<Vec<EntrySummary>, StorageError>;

    /// Load one full entry, or `None` if the id is unknown.
    fn entry(&self, id: EntryId) -> Result<Option<StoredEntry>, StorageError>;

    /// Delete an entry. Returns whether anything was removed; deleting an
    /// unknown id is not an error.
    fn delete_entry(&mut self, id: EntryId) -> Result<bool, StorageError>;
}

/// The single document both reference stores operate on.
///
/// [`JsonFileStore`] persists it verbatim as JSON; [`MemoryStore`] just holds
/// it. `next_id` is a monotonic counter so ids stay unique even after
/// deletions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoreDocument {
    pub(crate) master: Option<MasterRecord>,
    pub(crate) next_id: u64,
    pub(crate) entries: Vec<StoredEntry>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            master: None,
            next_id: 1,
            entries: Vec::new(),
        }
    }
}

impl StoreDocument {
    pub(crate) fn put_master_record(&mut self, record: &MasterRecord) -> Result<(), StorageError> {
        if self.master.is_some() {
            return Err(StorageError::MasterRecordExists);
        }
        self.master = Some(record.clone());
        Ok(())
    }

    pub(crate) fn insert_entry(
        &mut self,
        site: &str,
        account: &str,
        sealed_secret: SealedSecret,
    ) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(StoredEntry {
            id,
            site: site.to_string(),
            account: account.to_string(),
            sealed_secret,
        });
        id
    }

    pub(crate) fn summaries(&self) -> Vec<EntrySummary> {
        self.entries
            .iter()
            .map(|e| EntrySummary {
                id: e.id,
                site: e.site.clone(),
                account: e.account.clone(),
            })
            .collect()
    }

    pub(crate) fn entry(&self, id: EntryId) -> Option<StoredEntry> {
        self.entries.iter().find(|e| e.id == id).cloned()
    }

    pub(crate) fn delete_entry(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }
}
