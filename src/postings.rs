// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary codec for a single posting-list record.
//!
//! A record is `count: varint` followed by `count` delta-encoded varints:
//! since a posting list is strictly increasing, each successive value is
//! re-expressed as the (non-negative) gap from its predecessor, which keeps
//! the common case — clustered, small gaps — cheap to store. Skip pointers
//! are never serialised; [`crate::skiplist::SkipList::build_from`]
//! recomputes them from the decoded sequence on load.
//!
//! # References
//!
//! - Varint (LEB128): little-endian base-128 variable-length integers, as
//!   used by DWARF and Protocol Buffers.
//! - Delta encoding of posting lists: Zobel & Moffat, "Inverted Files for
//!   Text Search Engines", ACM Computing Surveys 38(2), 2006, §2.

use std::io;

use crate::skiplist::PostingId;

/// Hard ceiling on a single varint's encoded length. A u64 needs at most
/// 10 groups of 7 bits; anything longer is malformed input.
const MAX_VARINT_BYTES: usize = 10;

/// Sanity ceiling on the declared element count of one record, to reject
/// corrupt length prefixes before they drive a huge allocation.
const MAX_RECORD_LEN: u64 = 1 << 32;

fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;
    let mut i = 0;

    while i < bytes.len() && i < MAX_VARINT_BYTES {
        let byte = bytes[i];
        result |= ((byte & 0x7F) as u64) << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Ok((result, i));
        }
        shift += 7;
    }

    if i >= MAX_VARINT_BYTES {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "varint exceeds maximum length (possible corruption)",
        ))
    } else {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated varint"))
    }
}

/// Encode a sorted, deduplicated posting list as one self-delimited record.
pub fn encode_postings(postings: &[PostingId]) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_varint(postings.len() as u64, &mut buf);
    let mut prev: PostingId = 0;
    for (i, &p) in postings.iter().enumerate() {
        let delta = if i == 0 { p as u64 } else { (p - prev) as u64 };
        encode_varint(delta, &mut buf);
        prev = p;
    }
    buf
}

/// Decode exactly one record from the start of `bytes`, returning the
/// posting list and the number of bytes consumed.
///
/// Any framing inconsistency — a declared count too large for the buffer,
/// a truncated varint, or leftover garbage mid-delta — is reported as
/// [`io::Error`] with `InvalidData`/`UnexpectedEof`, which callers in
/// [`crate::store`] map onto [`crate::error::IrError::CorruptIndex`].
pub fn decode_postings(bytes: &[u8]) -> io::Result<(Vec<PostingId>, usize)> {
    let (count, mut pos) = decode_varint(bytes)?;
    if count > MAX_RECORD_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("posting record count {} exceeds sanity limit", count),
        ));
    }
    let count = count as usize;

    let mut postings = Vec::with_capacity(count);
    let mut prev: u64 = 0;
    for i in 0..count {
        if pos >= bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("truncated posting record at entry {}", i),
            ));
        }
        let (delta, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;
        let value = if i == 0 { delta } else { prev + delta };
        if value > PostingId::MAX as u64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("posting id {} overflows u32", value),
            ));
        }
        postings.push(value as PostingId);
        prev = value;
    }

    Ok((postings, pos))
}
