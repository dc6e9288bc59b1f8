//! # LSM Manifest Edit Core
//!
//! The change-record encoding for the metadata log ("manifest") of an
//! LSM-tree storage engine.
//!
//! ## Core idea
//! An engine's data files are immutable once written; what changes is the
//! *set* of live files. Every structural change — a flush adding a file, a
//! compaction swapping several files for one, counters advancing — is
//! captured as a small [`VersionEdit`] and appended to the manifest log.
//! Replaying the log from the start rebuilds the engine's exact file layout,
//! which is how recovery works after a restart.
//!
//! This crate owns the edit's data model, its tag-prefixed binary format,
//! the decoder's corruption-detection contract, and the keyspace split
//! operation. Log framing, file I/O, and version building are the callers'
//! business.

pub mod coding;
pub mod comparator;
pub mod error;
pub mod manifest;
pub mod types;

// Public re-exports for the top-level API
pub use comparator::{BytewiseComparator, Comparator, InternalKeyComparator};
pub use error::{CorruptField, Error, Result};
pub use manifest::{FileMetaData, NUM_LEVELS, SplitSide, VersionEdit};
pub use types::{InternalKey, ValueType};
