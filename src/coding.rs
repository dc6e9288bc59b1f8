//! Variable-length integer and length-prefixed span primitives.
//!
//! Varints use the standard little-endian base-128 continuation encoding:
//! seven payload bits per byte, high bit set on every byte but the last.
//! Small values (the common case for tags, levels, and file numbers early in
//! a database's life) take one byte instead of four or eight.

use bytes::{Buf, BufMut, BytesMut};

/// Append a varint32.
pub fn put_varint32(buf: &mut BytesMut, value: u32) {
    put_varint64(buf, value as u64);
}

/// Append a varint64.
pub fn put_varint64(buf: &mut BytesMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Append a varint length followed by the raw bytes.
pub fn put_length_prefixed(buf: &mut BytesMut, data: &[u8]) {
    put_varint32(buf, data.len() as u32);
    buf.put_slice(data);
}

/// Read a varint32, advancing the cursor. None on truncation, overlong
/// encoding (more than 5 bytes), or a value exceeding 32 bits.
pub fn get_varint32(cursor: &mut &[u8]) -> Option<u32> {
    let mut result: u32 = 0;
    let mut shift = 0;
    loop {
        if cursor.is_empty() {
            return None;
        }
        let byte = cursor.get_u8();
        if shift == 28 && byte > 0x0F {
            return None;
        }
        result |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 == 0 {
            return Some(result);
        }
        shift += 7;
        if shift > 28 {
            return None;
        }
    }
}

/// Read a varint64, advancing the cursor. None on truncation or an
/// encoding wider than 10 bytes.
pub fn get_varint64(cursor: &mut &[u8]) -> Option<u64> {
    let mut result: u64 = 0;
    let mut shift = 0;
    loop {
        if cursor.is_empty() {
            return None;
        }
        let byte = cursor.get_u8();
        if shift == 63 && byte > 0x01 {
            return None;
        }
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Some(result);
        }
        shift += 7;
        if shift > 63 {
            return None;
        }
    }
}

/// Read a length-prefixed span, advancing the cursor past it.
/// The returned slice borrows from the input; callers that keep the data
/// must copy it out.
pub fn get_length_prefixed<'a>(cursor: &mut &'a [u8]) -> Option<&'a [u8]> {
    let len = get_varint32(cursor)? as usize;
    if cursor.len() < len {
        return None;
    }
    let (data, rest) = cursor.split_at(len);
    *cursor = rest;
    Some(data)
}
