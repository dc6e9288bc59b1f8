use std::cmp::Ordering;
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

/// Raw user key bytes.
pub type Key = Vec<u8>;

/// Distinguishes puts from deletes in the storage engine.
/// A Delete writes a tombstone — the key isn't removed, it's marked as deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// A normal put operation.
    Put = 0x01,
    /// A delete (tombstone marker).
    Delete = 0x02,
}

impl ValueType {
    /// Parse a trailer type byte. Returns None for values never written.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(ValueType::Put),
            0x02 => Some(ValueType::Delete),
            _ => None,
        }
    }
}

/// Size of the packed `(sequence << 8) | type` trailer.
const TRAILER_SIZE: usize = 8;

/// Internal key format: user key + sequence number + value type.
///
/// Ordering: (user_key ASC, sequence DESC).
/// This ensures the newest version of a key always comes first during merging.
///
/// The sequence number is a monotonically increasing counter assigned to each
/// write operation. It provides a total ordering of all writes.
///
/// Encoded form:
/// ```text
/// ┌───────────────────┬──────────────────────────────────┐
/// │ user key (var)    │ (sequence << 8) | type (8B, LE)  │
/// └───────────────────┴──────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalKey {
    pub user_key: Key,
    pub sequence: u64,
    pub value_type: ValueType,
}

impl InternalKey {
    pub fn new(user_key: Key, sequence: u64, value_type: ValueType) -> Self {
        InternalKey {
            user_key,
            sequence,
            value_type,
        }
    }

    /// Packed trailer: sequence in the top 56 bits, type in the bottom 8.
    /// Comparing trailers numerically compares (sequence, type) at once.
    fn trailer(&self) -> u64 {
        (self.sequence << 8) | self.value_type as u64
    }

    /// Serialize to bytes: user key followed by the 8-byte trailer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.user_key.len() + TRAILER_SIZE);
        buf.put_slice(&self.user_key);
        buf.put_u64_le(self.trailer());
        buf.freeze()
    }

    /// Deserialize from bytes. Copies the user key out of the input.
    /// Returns None if the span is shorter than the trailer or the type
    /// byte is not a value ever written.
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() < TRAILER_SIZE {
            return None;
        }
        let (user_key, trailer_bytes) = data.split_at(data.len() - TRAILER_SIZE);
        let trailer = u64::from_le_bytes(trailer_bytes.try_into().ok()?);
        let value_type = ValueType::from_u8((trailer & 0xFF) as u8)?;
        Some(InternalKey {
            user_key: user_key.to_vec(),
            sequence: trailer >> 8,
            value_type,
        })
    }
}

impl Ord for InternalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Primary: user key ascending. Secondary: trailer descending, so the
        // newest version of a key sorts first.
        self.user_key
            .cmp(&other.user_key)
            .then_with(|| other.trailer().cmp(&self.trailer()))
    }
}

impl PartialOrd for InternalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for InternalKey {
    /// Diagnostic rendering: `'user_key' @ sequence : type`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' @ {} : {}",
            String::from_utf8_lossy(&self.user_key),
            self.sequence,
            self.value_type as u8
        )
    }
}
