// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk dictionary + postings store: the pair of files produced by the
//! indexer and consumed by the searcher.
//!
//! - The dictionary is UTF-8 text, one `stem,offset` line per term, where
//!   `offset` is the absolute byte position of that term's record in the
//!   postings file.
//! - The postings file is a concatenation of [`crate::postings`] records
//!   in dictionary order, followed by a trailing 4-byte CRC32 (little
//!   endian) of everything before it — the single-section analogue of the
//!   teacher's header+footer checksum discipline, scaled down since this
//!   store has only one section instead of several.
//!
//! The reserved **universal stem** is the empty string: the external
//! preprocessor only ever emits non-empty alphabetic stems, so it can never
//! collide with a real term. Its record, containing every [`PostingId`]
//! ever seen by the indexer, is always written first (offset 0).

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::IrError;
use crate::postings::{decode_postings, encode_postings};
use crate::skiplist::{PostingId, SkipList};

/// The reserved key for the record containing every posting in the
/// collection. Unproducible by the external preprocessor (which never
/// yields an empty stem), so it cannot collide with a real term.
pub const UNIVERSAL_STEM: &str = "";

/// Write the dictionary and postings files for a completed index build.
///
/// `entries` must be in the order records should be written; the caller
/// (see [`crate::indexer`]) is responsible for putting the universal stem
/// first. Each stem's posting list must already be sorted and deduplicated.
pub fn write_store(
    dict_path: &Path,
    postings_path: &Path,
    entries: &[(String, Vec<PostingId>)],
) -> io::Result<()> {
    let mut dict = String::new();
    let mut postings_bytes = Vec::new();

    for (stem, ids) in entries {
        let offset = postings_bytes.len();
        dict.push_str(stem);
        dict.push(',');
        dict.push_str(&offset.to_string());
        dict.push('\n');
        postings_bytes.extend_from_slice(&encode_postings(ids));
    }

    let checksum = crc32fast::hash(&postings_bytes);
    postings_bytes.extend_from_slice(&checksum.to_le_bytes());

    fs::write(dict_path, dict)?;
    fs::write(postings_path, postings_bytes)
}

/// An open session over a dictionary + postings store: holds the postings
/// file handle open, offers seek-and-decode term lookups, and caches
/// results per [`crate::error`] §5's per-session term cache.
pub struct IndexReader {
    offsets: HashMap<String, u64>,
    postings_file: fs::File,
    postings_len: u64,
    cache: HashMap<String, SkipList>,
}

impl IndexReader {
    /// Open a dictionary + postings pair, validating the trailing checksum
    /// once up front so corruption is caught at session start.
    pub fn open(dict_path: &Path, postings_path: &Path) -> Result<IndexReader, IrError> {
        let dict_text = fs::read_to_string(dict_path).map_err(|e| IrError::BadArguments {
            message: format!("cannot read dictionary {}: {}", dict_path.display(), e),
        })?;

        let mut offsets = HashMap::new();
        for (lineno, line) in dict_text.lines().enumerate() {
            let (stem, offset) = line.rsplit_once(',').ok_or_else(|| IrError::CorruptIndex {
                detail: format!("dictionary line {} missing ','", lineno + 1),
            })?;
            let offset: u64 = offset.parse().map_err(|_| IrError::CorruptIndex {
                detail: format!("dictionary line {} has non-numeric offset {:?}", lineno + 1, offset),
            })?;
            offsets.insert(stem.to_string(), offset);
        }

        let mut postings_file = fs::File::open(postings_path).map_err(|e| IrError::BadArguments {
            message: format!("cannot open postings file {}: {}", postings_path.display(), e),
        })?;

        let total_len = postings_file
            .metadata()
            .map_err(|e| IrError::CorruptIndex {
                detail: format!("cannot stat postings file: {}", e),
            })?
            .len();
        if total_len < 4 {
            return Err(IrError::CorruptIndex {
                detail: "postings file shorter than its trailing checksum".to_string(),
            });
        }
        let postings_len = total_len - 4;

        let mut body = vec![0u8; postings_len as usize];
        postings_file
            .read_exact(&mut body)
            .map_err(|e| IrError::CorruptIndex {
                detail: format!("failed reading postings body: {}", e),
            })?;
        let mut checksum_bytes = [0u8; 4];
        postings_file
            .read_exact(&mut checksum_bytes)
            .map_err(|e| IrError::CorruptIndex {
                detail: format!("failed reading postings checksum: {}", e),
            })?;
        let stored = u32::from_le_bytes(checksum_bytes);
        let computed = crc32fast::hash(&body);
        if stored != computed {
            return Err(IrError::CorruptIndex {
                detail: format!(
                    "postings checksum mismatch: stored {:08x}, computed {:08x}",
                    stored, computed
                ),
            });
        }

        Ok(IndexReader {
            offsets,
            postings_file,
            postings_len,
            cache: HashMap::new(),
        })
    }

    /// Load a stem's posting list, seeking and decoding only on first
    /// reference within this session; subsequent references are served
    /// from the per-session term cache.
    pub fn load_stem(&mut self, stem: &str) -> Result<SkipList, IrError> {
        if let Some(cached) = self.cache.get(stem) {
            return Ok(cached.clone());
        }

        let Some(&offset) = self.offsets.get(stem) else {
            // UnknownStem is not an error: treat as an empty posting list.
            let empty = SkipList::default();
            self.cache.insert(stem.to_string(), empty.clone());
            return Ok(empty);
        };

        if offset >= self.postings_len {
            return Err(IrError::CorruptIndex {
                detail: format!("offset {} for stem {:?} is past end of postings file", offset, stem),
            });
        }

        self.postings_file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| IrError::CorruptIndex {
                detail: format!("seek to offset {} failed: {}", offset, e),
            })?;

        let remaining = (self.postings_len - offset) as usize;
        let mut buf = vec![0u8; remaining];
        self.postings_file
            .read_exact(&mut buf)
            .map_err(|e| IrError::CorruptIndex {
                detail: format!("read at offset {} failed: {}", offset, e),
            })?;

        let (ids, _consumed) = decode_postings(&buf).map_err(|e| IrError::CorruptIndex {
            detail: format!("decoding record for stem {:?} at offset {}: {}", stem, offset, e),
        })?;

        let list = SkipList::build_from(&ids);
        self.cache.insert(stem.to_string(), list.clone());
        Ok(list)
    }

    /// Load the universal list (every posting ever seen), used by
    /// `complement`.
    pub fn load_universe(&mut self) -> Result<SkipList, IrError> {
        self.load_stem(UNIVERSAL_STEM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn build_fixture_store() -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("dict.txt");
        let postings_path = dir.path().join("postings.bin");

        let entries = vec![
            (UNIVERSAL_STEM.to_string(), vec![1, 2, 3, 4]),
            ("cat".to_string(), vec![1, 2]),
            ("dog".to_string(), vec![1, 3]),
            ("fish".to_string(), vec![3, 4]),
        ];
        write_store(&dict_path, &postings_path, &entries).unwrap();
        (dir, dict_path, postings_path)
    }

    #[test]
    fn writes_offsets_not_just_stems() {
        let (_dir, dict_path, _postings_path) = build_fixture_store();
        let text = fs::read_to_string(&dict_path).unwrap();
        for line in text.lines() {
            let (_stem, offset) = line.rsplit_once(',').expect("line must have an offset");
            offset.parse::<u64>().expect("offset must be numeric");
        }
    }

    #[test]
    fn universal_stem_is_first_and_at_offset_zero() {
        let (_dir, dict_path, _postings_path) = build_fixture_store();
        let text = fs::read_to_string(&dict_path).unwrap();
        let first_line = text.lines().next().unwrap();
        assert_eq!(first_line, ",0");
    }

    #[test]
    fn round_trips_every_stem() {
        let (_dir, dict_path, postings_path) = build_fixture_store();
        let mut reader = IndexReader::open(&dict_path, &postings_path).unwrap();

        assert_eq!(reader.load_stem("cat").unwrap().to_list(), vec![1, 2]);
        assert_eq!(reader.load_stem("dog").unwrap().to_list(), vec![1, 3]);
        assert_eq!(reader.load_universe().unwrap().to_list(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn unknown_stem_is_empty_not_an_error() {
        let (_dir, dict_path, postings_path) = build_fixture_store();
        let mut reader = IndexReader::open(&dict_path, &postings_path).unwrap();
        let result = reader.load_stem("bird").unwrap();
        assert_eq!(result.to_list(), Vec::<PostingId>::new());
    }

    #[test]
    fn repeated_lookup_is_served_from_cache() {
        let (_dir, dict_path, postings_path) = build_fixture_store();
        let mut reader = IndexReader::open(&dict_path, &postings_path).unwrap();
        let first = reader.load_stem("cat").unwrap();
        let second = reader.load_stem("cat").unwrap();
        assert_eq!(first.to_list(), second.to_list());
    }

    #[test]
    fn corrupted_checksum_is_rejected_at_open() {
        let (_dir, dict_path, postings_path) = build_fixture_store();
        let mut bytes = fs::read(&postings_path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        fs::write(&postings_path, &bytes).unwrap();

        let result = IndexReader::open(&dict_path, &postings_path);
        assert!(matches!(result, Err(IrError::CorruptIndex { .. })));
    }

    #[test]
    fn malformed_dictionary_line_is_corrupt_index() {
        let (_dir, dict_path, postings_path) = build_fixture_store();
        fs::write(&dict_path, "no-comma-here\n").unwrap();
        let result = IndexReader::open(&dict_path, &postings_path);
        assert!(matches!(result, Err(IrError::CorruptIndex { .. })));
    }
}
