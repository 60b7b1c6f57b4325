//! Temporary storage for uploaded files.

use crate::value::FileData;

/// Key/value store holding uploads between a failed submission and the
/// next attempt.
///
/// Implementations are shared between requests, so every method takes
/// `&self`.
pub trait TmpStore: Send + Sync {
    /// Returns the file stored under `uid`.
    fn get(&self, uid: &str) -> Option<FileData>;

    /// Stores a file under `uid`, replacing any previous entry.
    fn insert(&self, uid: &str, file: FileData);

    /// Removes a single entry.
    fn remove(&self, uid: &str) -> Option<FileData>;

    /// Removes every entry.
    fn clear(&self);

    /// URL under which a preview of the file can be fetched.
    fn preview_url(&self, _uid: &str) -> Option<String> {
        None
    }
}
