//! Process-lifetime upload store shared by the file demos.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use oxide_forms::{FileData, TmpStore};
use tracing::debug;

/// In-memory [`TmpStore`]. Keys are upload uids.
#[derive(Debug, Default)]
pub struct MemoryTmpStore {
    files: RwLock<HashMap<String, FileData>>,
}

impl MemoryTmpStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TmpStore for MemoryTmpStore {
    fn get(&self, uid: &str) -> Option<FileData> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uid)
            .cloned()
    }

    fn insert(&self, uid: &str, file: FileData) {
        debug!(uid, filename = %file.filename, "Storing temporary file");
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uid.to_string(), file);
    }

    fn remove(&self, uid: &str) -> Option<FileData> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uid)
    }

    fn clear(&self) {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        debug!(count = files.len(), "Clearing temporary files");
        files.clear();
    }
}
