// Decoder corruption-detection tests.
// Malformed manifest bytes must fail with a value error naming the field
// that broke — never a panic, never a silently half-parsed edit.

use lsm_manifest::{CorruptField, Error, FileMetaData, InternalKey, ValueType, VersionEdit};

fn key(user_key: &[u8], seq: u64) -> InternalKey {
    InternalKey::new(user_key.to_vec(), seq, ValueType::Put)
}

fn corrupt_field(result: Result<VersionEdit, Error>) -> CorruptField {
    match result {
        Err(Error::Corruption { source, field }) => {
            assert_eq!(source, "VersionEdit");
            field
        }
        Ok(_) => panic!("decode unexpectedly succeeded"),
    }
}

fn sample_edit() -> VersionEdit {
    let mut edit = VersionEdit::new();
    edit.set_comparator_name("leveldb.BytewiseComparator");
    edit.set_log_number(10);
    edit.set_prev_log_number(9);
    edit.set_next_file_number(150);
    edit.set_last_sequence(5000);
    edit.add_compact_pointer(3, key(b"cursor", 77));
    edit.delete_file(1, 17);
    edit.add_file(2, FileMetaData::new(20, 4096, key(b"a", 1), key(b"m", 2)));
    edit
}

// =============================================================================
// Test 1: The retired tag 8 is rejected as unknown
// =============================================================================
#[test]
fn retired_tag_rejected() {
    assert_eq!(corrupt_field(VersionEdit::decode_from(&[8])), CorruptField::UnknownTag);
}

// =============================================================================
// Test 2: Tags never assigned are rejected as unknown
// =============================================================================
#[test]
fn unassigned_tags_rejected() {
    for tag in [0u8, 10, 11, 42, 127] {
        assert_eq!(
            corrupt_field(VersionEdit::decode_from(&[tag])),
            CorruptField::UnknownTag,
            "tag {tag} should be unknown"
        );
    }
}

// =============================================================================
// Test 3: Dropping the final byte always fails, and no prefix panics
// =============================================================================
#[test]
fn truncation_detected() {
    let encoded = sample_edit().encode();

    let result = VersionEdit::decode_from(&encoded[..encoded.len() - 1]);
    assert!(result.is_err());

    // Shorter prefixes may legally end on a record boundary; they must
    // simply never panic.
    for len in 0..encoded.len() {
        let _ = VersionEdit::decode_from(&encoded[..len]);
    }
}

// =============================================================================
// Test 4: Truncation inside each scalar field names that field
// =============================================================================
#[test]
fn truncated_scalars_name_their_field() {
    // Tag byte alone, payload missing entirely.
    assert_eq!(corrupt_field(VersionEdit::decode_from(&[1])), CorruptField::ComparatorName);
    assert_eq!(corrupt_field(VersionEdit::decode_from(&[2])), CorruptField::LogNumber);
    assert_eq!(corrupt_field(VersionEdit::decode_from(&[3])), CorruptField::NextFileNumber);
    assert_eq!(corrupt_field(VersionEdit::decode_from(&[4])), CorruptField::LastSequence);
    assert_eq!(corrupt_field(VersionEdit::decode_from(&[9])), CorruptField::PrevLogNumber);

    // Comparator with a length prefix promising more bytes than exist.
    assert_eq!(
        corrupt_field(VersionEdit::decode_from(&[1, 10, b'a', b'b'])),
        CorruptField::ComparatorName
    );

    // Log number varint with its continuation bit dangling.
    assert_eq!(
        corrupt_field(VersionEdit::decode_from(&[2, 0x80])),
        CorruptField::LogNumber
    );
}

// =============================================================================
// Test 5: Truncated entry payloads name their entry category
// =============================================================================
#[test]
fn truncated_entries_name_their_field() {
    assert_eq!(corrupt_field(VersionEdit::decode_from(&[5])), CorruptField::CompactPointer);
    assert_eq!(corrupt_field(VersionEdit::decode_from(&[6])), CorruptField::DeletedFile);
    assert_eq!(corrupt_field(VersionEdit::decode_from(&[7])), CorruptField::NewFileEntry);

    // Deleted file with level but no file number.
    assert_eq!(
        corrupt_field(VersionEdit::decode_from(&[6, 1])),
        CorruptField::DeletedFile
    );

    // Compaction pointer whose key span is shorter than an encoded key.
    assert_eq!(
        corrupt_field(VersionEdit::decode_from(&[5, 1, 2, 0xAA, 0xBB])),
        CorruptField::CompactPointer
    );
}

// =============================================================================
// Test 6: Level at the NUM_LEVELS bound is corruption, per entry kind
// =============================================================================
#[test]
fn out_of_range_level_rejected() {
    // DeletedFile: tag 6, level 7, file number 1.
    assert_eq!(
        corrupt_field(VersionEdit::decode_from(&[6, 7, 1])),
        CorruptField::DeletedFile
    );

    // NewFile: tag 7, level 7, then fields that would otherwise parse.
    let mut bytes = vec![7u8, 7, 20, 100];
    let k = key(b"a", 1).encode();
    bytes.push(k.len() as u8);
    bytes.extend_from_slice(&k);
    bytes.push(k.len() as u8);
    bytes.extend_from_slice(&k);
    assert_eq!(
        corrupt_field(VersionEdit::decode_from(&bytes)),
        CorruptField::NewFileEntry
    );

    // CompactPointer: tag 5, level 7, then a valid key.
    let mut bytes = vec![5u8, 7];
    bytes.push(k.len() as u8);
    bytes.extend_from_slice(&k);
    assert_eq!(
        corrupt_field(VersionEdit::decode_from(&bytes)),
        CorruptField::CompactPointer
    );

    // Level 6 is the largest legal value.
    let decoded = VersionEdit::decode_from(&[6, 6, 1]).unwrap();
    assert!(decoded.deleted_files.contains(&(6, 1)));
}

// =============================================================================
// Test 7: Trailing garbage after a valid edit is corruption
// =============================================================================
#[test]
fn trailing_garbage_rejected() {
    let mut encoded = sample_edit().encode().to_vec();

    // A dangling continuation byte can't even form a tag.
    encoded.push(0xC8);
    assert_eq!(
        corrupt_field(VersionEdit::decode_from(&encoded)),
        CorruptField::InvalidTag
    );

    // A byte that parses as a known tag fails downstream on its payload.
    encoded.pop();
    encoded.push(4);
    assert_eq!(
        corrupt_field(VersionEdit::decode_from(&encoded)),
        CorruptField::LastSequence
    );
}

// =============================================================================
// Test 8: A corrupt key trailer inside a new-file entry is caught
// =============================================================================
#[test]
fn bad_key_trailer_rejected() {
    let mut edit = VersionEdit::new();
    edit.add_file(0, FileMetaData::new(1, 10, key(b"a", 1), key(b"b", 2)));
    let mut encoded = edit.encode().to_vec();

    // The last 8 bytes of the encoding are the largest key's trailer; its
    // low byte is the value type. Stomp it with a type never written.
    let type_pos = encoded.len() - 8;
    encoded[type_pos] = 0x63;
    assert_eq!(
        corrupt_field(VersionEdit::decode_from(&encoded)),
        CorruptField::NewFileEntry
    );
}

// =============================================================================
// Test 9: Errors render with the source tag for log correlation
// =============================================================================
#[test]
fn error_display_includes_source() {
    let err = VersionEdit::decode_from(&[8]).unwrap_err();
    assert_eq!(err.to_string(), "Corruption: VersionEdit: unknown tag");

    let err = VersionEdit::decode_from(&[2]).unwrap_err();
    assert_eq!(err.to_string(), "Corruption: VersionEdit: log number");
}
