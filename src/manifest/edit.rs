use std::collections::BTreeSet;
use std::fmt;

use bytes::{Bytes, BytesMut};

use crate::coding::{
    get_length_prefixed, get_varint32, get_varint64, put_length_prefixed, put_varint32,
    put_varint64,
};
use crate::comparator::{Comparator, InternalKeyComparator};
use crate::error::{CorruptField, Error, Result};
use crate::manifest::{FileMetaData, NUM_LEVELS};
use crate::types::InternalKey;

/// Error source tag, for correlating corruption reports in engine logs.
const SOURCE: &str = "VersionEdit";

/// Wire tags for serialized edits. These values are written to disk and
/// must never change or be reassigned.
///
/// Tag 8 once marked large value references and is permanently retired;
/// reusing it would make old and new manifests ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Comparator = 1,
    LogNumber = 2,
    NextFileNumber = 3,
    LastSequence = 4,
    CompactPointer = 5,
    DeletedFile = 6,
    NewFile = 7,
    PrevLogNumber = 9,
}

impl Tag {
    fn from_u32(value: u32) -> Option<Tag> {
        match value {
            1 => Some(Tag::Comparator),
            2 => Some(Tag::LogNumber),
            3 => Some(Tag::NextFileNumber),
            4 => Some(Tag::LastSequence),
            5 => Some(Tag::CompactPointer),
            6 => Some(Tag::DeletedFile),
            7 => Some(Tag::NewFile),
            9 => Some(Tag::PrevLogNumber),
            _ => None,
        }
    }
}

/// Which half of the keyspace a [`VersionEdit::split`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitSide {
    /// Keep keys below the boundary. The boundary key itself stays on
    /// this side.
    Left,
    /// Keep keys above the boundary.
    Right,
}

/// One atomic change record in the manifest.
///
/// An edit captures a single structural transaction: files added to and
/// removed from levels, counters advancing, compaction cursors moving.
/// The manifest log is a sequence of these; replaying them in order
/// reconstructs the engine's file layout after a restart.
///
/// Every field is optional — a flush edit sets different fields than a
/// compaction edit — and absent fields cost zero bytes on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionEdit {
    /// Name of the key ordering. Set once, on the edit that creates the
    /// manifest; readers refuse to open a database under a different order.
    pub comparator_name: Option<String>,
    /// WAL file whose records are reflected in the files of this edit.
    pub log_number: Option<u64>,
    /// WAL file from before the last memtable switch, if still live.
    pub prev_log_number: Option<u64>,
    /// Next file identifier the allocator will hand out.
    pub next_file_number: Option<u64>,
    /// Highest sequence number visible in this snapshot.
    pub last_sequence: Option<u64>,
    /// Per-level compaction resume points, in insertion order. A later
    /// pointer for the same level overrides an earlier one when applied.
    pub compact_pointers: Vec<(u32, InternalKey)>,
    /// Files removed from their level: (level, file number). A set — the
    /// same file cannot be deleted twice in one edit.
    pub deleted_files: BTreeSet<(u32, u64)>,
    /// Files added to a level, in insertion order. Order is preserved
    /// because application order can matter to the version builder.
    pub new_files: Vec<(u32, FileMetaData)>,
}

impl VersionEdit {
    /// Create an empty edit with every field absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the all-absent empty state for reuse.
    pub fn clear(&mut self) {
        *self = VersionEdit::new();
    }

    /// Whether no field has been set.
    pub fn is_empty(&self) -> bool {
        *self == VersionEdit::new()
    }

    pub fn set_comparator_name(&mut self, name: impl Into<String>) {
        self.comparator_name = Some(name.into());
    }

    pub fn set_log_number(&mut self, num: u64) {
        self.log_number = Some(num);
    }

    pub fn set_prev_log_number(&mut self, num: u64) {
        self.prev_log_number = Some(num);
    }

    pub fn set_next_file_number(&mut self, num: u64) {
        self.next_file_number = Some(num);
    }

    pub fn set_last_sequence(&mut self, seq: u64) {
        self.last_sequence = Some(seq);
    }

    /// Record where the next compaction of `level` should resume.
    pub fn add_compact_pointer(&mut self, level: u32, key: InternalKey) {
        self.compact_pointers.push((level, key));
    }

    /// Mark a file as no longer part of `level`.
    pub fn delete_file(&mut self, level: u32, file_number: u64) {
        self.deleted_files.insert((level, file_number));
    }

    /// Record a file as now belonging to `level`.
    pub fn add_file(&mut self, level: u32, file: FileMetaData) {
        self.new_files.push((level, file));
    }

    /// Serialize into `dst`: for each present field, its tag varint then the
    /// payload described by the tag. No terminator and no total length — the
    /// manifest log's record framing delimits one edit from the next.
    ///
    /// Encoding never fails and never validates. An edit with out-of-range
    /// levels or inverted key ranges is serialized faithfully; constructing
    /// valid edits is the caller's job.
    pub fn encode_to(&self, dst: &mut BytesMut) {
        if let Some(ref name) = self.comparator_name {
            put_varint32(dst, Tag::Comparator as u32);
            put_length_prefixed(dst, name.as_bytes());
        }
        if let Some(num) = self.log_number {
            put_varint32(dst, Tag::LogNumber as u32);
            put_varint64(dst, num);
        }
        if let Some(num) = self.prev_log_number {
            put_varint32(dst, Tag::PrevLogNumber as u32);
            put_varint64(dst, num);
        }
        if let Some(num) = self.next_file_number {
            put_varint32(dst, Tag::NextFileNumber as u32);
            put_varint64(dst, num);
        }
        if let Some(seq) = self.last_sequence {
            put_varint32(dst, Tag::LastSequence as u32);
            put_varint64(dst, seq);
        }

        for (level, key) in &self.compact_pointers {
            put_varint32(dst, Tag::CompactPointer as u32);
            put_varint32(dst, *level);
            put_length_prefixed(dst, &key.encode());
        }

        for &(level, file_number) in &self.deleted_files {
            put_varint32(dst, Tag::DeletedFile as u32);
            put_varint32(dst, level);
            put_varint64(dst, file_number);
        }

        for (level, f) in &self.new_files {
            put_varint32(dst, Tag::NewFile as u32);
            put_varint32(dst, *level);
            put_varint64(dst, f.number);
            put_varint64(dst, f.file_size);
            put_length_prefixed(dst, &f.smallest.encode());
            put_length_prefixed(dst, &f.largest.encode());
        }
    }

    /// Serialize to a fresh buffer. An empty edit encodes to zero bytes.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(256);
        self.encode_to(&mut buf);
        buf.freeze()
    }

    /// Reconstruct an edit from a byte span produced by [`encode_to`].
    ///
    /// Either the whole input parses and a fresh edit is returned, or a
    /// corruption error names the field category that failed. The input
    /// must be consumed exactly: trailing bytes that don't form a known
    /// tag are themselves corruption. Nothing borrowed from `input`
    /// survives the call — keys and names are copied out.
    ///
    /// [`encode_to`]: VersionEdit::encode_to
    pub fn decode_from(input: &[u8]) -> Result<VersionEdit> {
        let mut edit = VersionEdit::new();
        let mut cursor = input;

        while !cursor.is_empty() {
            // A malformed or truncated tag varint means the remaining bytes
            // can't be part of any record.
            let Some(raw_tag) = get_varint32(&mut cursor) else {
                return Err(corrupt(CorruptField::InvalidTag));
            };
            let Some(tag) = Tag::from_u32(raw_tag) else {
                return Err(corrupt(CorruptField::UnknownTag));
            };

            match tag {
                Tag::Comparator => {
                    let name = get_length_prefixed(&mut cursor)
                        .ok_or_else(|| corrupt(CorruptField::ComparatorName))?;
                    edit.comparator_name = Some(String::from_utf8_lossy(name).into_owned());
                }
                Tag::LogNumber => {
                    edit.log_number = Some(
                        get_varint64(&mut cursor).ok_or_else(|| corrupt(CorruptField::LogNumber))?,
                    );
                }
                Tag::PrevLogNumber => {
                    edit.prev_log_number = Some(
                        get_varint64(&mut cursor)
                            .ok_or_else(|| corrupt(CorruptField::PrevLogNumber))?,
                    );
                }
                Tag::NextFileNumber => {
                    edit.next_file_number = Some(
                        get_varint64(&mut cursor)
                            .ok_or_else(|| corrupt(CorruptField::NextFileNumber))?,
                    );
                }
                Tag::LastSequence => {
                    edit.last_sequence = Some(
                        get_varint64(&mut cursor)
                            .ok_or_else(|| corrupt(CorruptField::LastSequence))?,
                    );
                }
                Tag::CompactPointer => {
                    let entry = get_level(&mut cursor)
                        .and_then(|level| Some((level, get_internal_key(&mut cursor)?)))
                        .ok_or_else(|| corrupt(CorruptField::CompactPointer))?;
                    edit.compact_pointers.push(entry);
                }
                Tag::DeletedFile => {
                    let entry = get_level(&mut cursor)
                        .and_then(|level| Some((level, get_varint64(&mut cursor)?)))
                        .ok_or_else(|| corrupt(CorruptField::DeletedFile))?;
                    edit.deleted_files.insert(entry);
                }
                Tag::NewFile => {
                    let entry = decode_new_file(&mut cursor)
                        .ok_or_else(|| corrupt(CorruptField::NewFileEntry))?;
                    edit.new_files.push(entry);
                }
            }
        }

        Ok(edit)
    }

    /// Human-readable rendering for diagnostics and manifest dump tools.
    /// Lists present fields and entries in encoding order, one per line.
    /// Not a wire format; not required to round-trip.
    pub fn debug_string(&self) -> String {
        self.to_string()
    }

    /// Restrict the edit's new files to one side of a keyspace boundary.
    ///
    /// Used when a keyspace range is partitioned: each half keeps only the
    /// new-file entries that overlap it, with straddling entries clamped at
    /// the boundary. [`SplitSide::Left`] keeps files below the boundary;
    /// entries lying entirely above it are dropped and a straddling entry
    /// has its `largest` replaced by the boundary key. [`SplitSide::Right`]
    /// is the mirror image, clamping `smallest` instead. The boundary key
    /// itself lands on the left half.
    ///
    /// Compaction pointers are cleared unconditionally — they referred to
    /// the pre-split keyspace. `deleted_files` is untouched; the split
    /// applies only to newly introduced files. Clamping does not adjust
    /// `file_size`, so after a split the recorded size overstates the
    /// logical slice and must be treated as approximate.
    pub fn split<C: Comparator>(
        &mut self,
        boundary: &InternalKey,
        icmp: &InternalKeyComparator<C>,
        side: SplitSide,
    ) -> Result<()> {
        self.compact_pointers.clear();

        self.new_files.retain_mut(|(_, f)| match side {
            SplitSide::Left => {
                if icmp.compare(boundary, &f.smallest).is_lt() {
                    false
                } else {
                    if icmp.compare(&f.largest, boundary).is_ge() {
                        f.largest = boundary.clone();
                    }
                    true
                }
            }
            SplitSide::Right => {
                if icmp.compare(boundary, &f.largest).is_ge() {
                    false
                } else {
                    if icmp.compare(&f.smallest, boundary).is_lt() {
                        f.smallest = boundary.clone();
                    }
                    true
                }
            }
        });

        Ok(())
    }
}

impl fmt::Display for VersionEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionEdit {{")?;
        if let Some(ref name) = self.comparator_name {
            write!(f, "\n  Comparator: {name}")?;
        }
        if let Some(num) = self.log_number {
            write!(f, "\n  LogNumber: {num}")?;
        }
        if let Some(num) = self.prev_log_number {
            write!(f, "\n  PrevLogNumber: {num}")?;
        }
        if let Some(num) = self.next_file_number {
            write!(f, "\n  NextFile: {num}")?;
        }
        if let Some(seq) = self.last_sequence {
            write!(f, "\n  LastSeq: {seq}")?;
        }
        for (level, key) in &self.compact_pointers {
            write!(f, "\n  CompactPointer: {level} {key}")?;
        }
        for (level, number) in &self.deleted_files {
            write!(f, "\n  DeleteFile: {level} {number}")?;
        }
        for (level, meta) in &self.new_files {
            write!(
                f,
                "\n  AddFile: {level} {} {} {} .. {}",
                meta.number, meta.file_size, meta.smallest, meta.largest
            )?;
        }
        write!(f, "\n}}\n")
    }
}

fn corrupt(field: CorruptField) -> Error {
    Error::Corruption {
        source: SOURCE,
        field,
    }
}

/// Read a level index, enforcing the `NUM_LEVELS` bound.
fn get_level(cursor: &mut &[u8]) -> Option<u32> {
    let level = get_varint32(cursor)?;
    (level < NUM_LEVELS).then_some(level)
}

/// Read a length-prefixed encoded InternalKey, copying it out of the input.
fn get_internal_key(cursor: &mut &[u8]) -> Option<InternalKey> {
    let data = get_length_prefixed(cursor)?;
    InternalKey::decode(data)
}

fn decode_new_file(cursor: &mut &[u8]) -> Option<(u32, FileMetaData)> {
    let level = get_level(cursor)?;
    let number = get_varint64(cursor)?;
    let file_size = get_varint64(cursor)?;
    let smallest = get_internal_key(cursor)?;
    let largest = get_internal_key(cursor)?;
    Some((level, FileMetaData::new(number, file_size, smallest, largest)))
}
