use crate::types::InternalKey;

/// Metadata about one persisted sorted file, as recorded in the manifest.
///
/// The file's contents are exactly the keys in `[smallest, largest]`;
/// callers must keep `smallest <= largest` under the active comparator.
/// Once a file is referenced by a persisted version the descriptor is
/// immutable, except that a range split may clamp its bounds (see
/// [`VersionEdit::split`](super::VersionEdit::split)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetaData {
    /// Unique file identifier, handed out by the engine's allocator.
    pub number: u64,
    /// File size in bytes. Informational; feeds compaction heuristics.
    pub file_size: u64,
    /// Smallest key in the file.
    pub smallest: InternalKey,
    /// Largest key in the file.
    pub largest: InternalKey,
}

impl FileMetaData {
    pub fn new(number: u64, file_size: u64, smallest: InternalKey, largest: InternalKey) -> Self {
        FileMetaData {
            number,
            file_size,
            smallest,
            largest,
        }
    }
}
