//! Manifest metadata: the change records that describe how the set of live
//! SSTables evolves over time.
//!
//! The manifest is the engine's durable account of its own structure. Every
//! flush, compaction, or WAL rotation appends one [`VersionEdit`] describing
//! what changed; replaying them from the start reconstructs the full picture
//! of which files exist at which level.

pub mod edit;
pub mod file_meta;

pub use edit::{SplitSide, VersionEdit};
pub use file_meta::FileMetaData;

/// Number of levels in the storage hierarchy. Levels in persisted edits must
/// be below this bound; anything at or above it is corruption.
pub const NUM_LEVELS: u32 = 7;
