use std::fmt;

/// Which part of a serialized edit failed to parse.
///
/// The categories mirror the wire grammar one-to-one so that a corruption
/// report from a years-old manifest still points at a recognizable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptField {
    ComparatorName,
    LogNumber,
    PrevLogNumber,
    NextFileNumber,
    LastSequence,
    CompactPointer,
    DeletedFile,
    NewFileEntry,
    /// A tag value the decoder does not know. Unknown tags are fatal:
    /// silently skipping one could hide data loss.
    UnknownTag,
    /// Leftover bytes that do not form a tag, or a malformed tag varint.
    InvalidTag,
}

impl CorruptField {
    /// Short human-readable name, stable across releases.
    pub fn as_str(self) -> &'static str {
        match self {
            CorruptField::ComparatorName => "comparator name",
            CorruptField::LogNumber => "log number",
            CorruptField::PrevLogNumber => "previous log number",
            CorruptField::NextFileNumber => "next file number",
            CorruptField::LastSequence => "last sequence number",
            CorruptField::CompactPointer => "compaction pointer",
            CorruptField::DeletedFile => "deleted file",
            CorruptField::NewFileEntry => "new-file entry",
            CorruptField::UnknownTag => "unknown tag",
            CorruptField::InvalidTag => "invalid tag",
        }
    }
}

/// Unified error type for the manifest core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Persisted bytes do not conform to the edit grammar.
    /// `source` identifies the decoder for log correlation.
    Corruption {
        source: &'static str,
        field: CorruptField,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Corruption { source, field } => {
                write!(f, "Corruption: {}: {}", source, field.as_str())
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
