//! Durable JSON-file store.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use super::{
    EntryId, EntryStore, EntrySummary, MasterRecord, MasterStore, StorageError, StoreDocument,
    StoredEntry,
};
use crate::crypto::envelope::SealedSecret;

/// Whole-document JSON store backed by a single file.
///
/// The document is read once at [`open`](Self::open) and rewritten in full on
/// every mutation. Writes go through a sibling temp file followed by an
/// atomic rename, so a crash mid-write leaves the previous document intact
/// rather than a half-written one.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty document in memory if the
    /// file does not exist yet. Nothing touches the disk until the first
    /// mutation.
    ///
    /// # Errors
    ///
    /// - `StorageError::Io`: the file exists but could not be read
    /// - `StorageError::Corrupt`: the file exists but is not a valid document
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let doc = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoreDocument::default(),
            Err(e) => return Err(StorageError::Io(e)),
        };

        debug!(
            path = %path.display(),
            enrolled = doc.master.is_some(),
            entries = doc.entries.len(),
            "vault store opened"
        );
        Ok(Self { path, doc })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(&self.doc)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Stage next to the target so the rename stays on one filesystem
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&json)?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|e| StorageError::Io(e.error))?;

        trace!(path = %self.path.display(), bytes = json.len(), "store document persisted");
        Ok(())
    }
}

impl MasterStore for JsonFileStore {
    fn master_record(&self) -> Result<Option<MasterRecord>, StorageError> {
        Ok(self.doc.master.clone())
    }

    fn put_master_record(&mut self, record: &MasterRecord) -> Result<(), StorageError> {
        self.doc.put_master_record(record)?;
        self.persist()
    }
}

impl EntryStore for JsonFileStore {
    fn insert_entry(
        &mut self,
        site: &str,
        account: &str,
        sealed_secret: SealedSecret,
    ) -> Result<EntryId, StorageError> {
        let id = self.doc.insert_entry(site, account, sealed_secret);
        self.persist()?;
        Ok(id)
    }

    fn entries(&self) -> Result<Vec<EntrySummary>, StorageError> {
        Ok(self.doc.summaries())
    }

    fn entry(&self, id: EntryId) -> Result<Option<StoredEntry>, StorageError> {
        Ok(self.doc.entry(id))
    }

    fn delete_entry(&mut self, id: EntryId) -> Result<bool, StorageError> {
        let removed = self.doc.delete_entry(id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}
