//! In-memory store for tests and embedding.

use super::{
    EntryId, EntryStore, EntrySummary, MasterRecord, MasterStore, StorageError, StoreDocument,
    StoredEntry,
};
use crate::crypto::envelope::SealedSecret;

/// Volatile store holding the document in memory. Same semantics as
/// [`JsonFileStore`](super::JsonFileStore), minus the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: StoreDocument,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MasterStore for MemoryStore {
    fn master_record(&self) -> Result<Option<MasterRecord>, StorageError> {
        Ok(self.doc.master.clone())
    }

    fn put_master_record(&mut self, record: &MasterRecord) -> Result<(), StorageError> {
        self.doc.put_master_record(record)
    }
}

impl EntryStore for MemoryStore {
    fn insert_entry(
        &mut self,
        site: &str,
        account: &str,
        sealed_secret: SealedSecret,
    ) -> Result<EntryId, StorageError> {
        Ok(self.doc.insert_entry(site, account, sealed_secret))
    }

    fn entries(&self) -> Result<Vec<EntrySummary>, StorageError> {
        Ok(self.doc.summaries())
    }

    fn entry(&self, id: EntryId) -> Result<Option<StoredEntry>, StorageError> {
        Ok(self.doc.entry(id))
    }

    fn delete_entry(&mut self, id: EntryId) -> Result<bool, StorageError> {
        Ok(self.doc.delete_entry(id))
    }
}
