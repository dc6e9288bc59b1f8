use std::cmp::Ordering;

use crate::types::InternalKey;

/// Total order over user keys.
///
/// The name is persisted in the manifest so an engine reopening a database
/// can refuse to run with a different ordering than the one the files were
/// written under.
pub trait Comparator {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;
    fn name(&self) -> &'static str;
}

/// Plain lexicographic byte ordering. The default for every database that
/// doesn't install a custom comparator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytewiseComparator;

impl Comparator for BytewiseComparator {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }

    fn name(&self) -> &'static str {
        "leveldb.BytewiseComparator"
    }
}

/// Orders InternalKeys: user keys by the wrapped comparator, ties broken by
/// the packed `(sequence << 8) | type` trailer descending (newest first).
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalKeyComparator<C: Comparator = BytewiseComparator> {
    user_cmp: C,
}

impl<C: Comparator> InternalKeyComparator<C> {
    pub fn new(user_cmp: C) -> Self {
        InternalKeyComparator { user_cmp }
    }

    pub fn compare(&self, a: &InternalKey, b: &InternalKey) -> Ordering {
        match self.user_cmp.compare(&a.user_key, &b.user_key) {
            Ordering::Equal => {
                let a_trailer = (a.sequence << 8) | a.value_type as u64;
                let b_trailer = (b.sequence << 8) | b.value_type as u64;
                b_trailer.cmp(&a_trailer)
            }
            ord => ord,
        }
    }

    /// Name of the underlying user-key comparator.
    pub fn name(&self) -> &'static str {
        self.user_cmp.name()
    }
}
