// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Indexer driver: walks a document directory, accumulates per-stem sorted
//! posting lists, and hands back entries ready for [`crate::store::write_store`].
//!
//! Loading and preprocessing each document is embarrassingly parallel (no
//! document's stems depend on another's), so behind the `parallel` feature
//! this walks the directory with rayon the way the teacher's build pipeline
//! parallelises document loading; merging each document's stem set into
//! the shared per-stem lists stays single-threaded since it mutates shared
//! state.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::error::IrError;
use crate::skiplist::PostingId;
use crate::store::UNIVERSAL_STEM;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One document as seen by the indexer: its derived [`PostingId`] and the
/// deduplicated set of stems the external preprocessor extracted from it.
struct LoadedDocument {
    id: PostingId,
    stems: BTreeSet<String>,
}

/// Parse a document's basename as its [`PostingId`]. A filename that isn't
/// a non-negative integer is a configuration error, not a run-level one.
fn posting_id_from_filename(path: &Path) -> Result<PostingId, IrError> {
    let stem = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        IrError::BadArguments {
            message: format!("document filename {} is not valid UTF-8", path.display()),
        }
    })?;
    stem.parse::<PostingId>().map_err(|_| IrError::BadArguments {
        message: format!("document filename {:?} does not parse as a non-negative integer", stem),
    })
}

fn load_document(
    path: &Path,
    preprocess: &(dyn Fn(&str) -> BTreeSet<String> + Sync),
) -> Result<LoadedDocument, IrError> {
    let id = posting_id_from_filename(path)?;
    let text = fs::read_to_string(path).map_err(|e| IrError::BadArguments {
        message: format!("cannot read document {}: {}", path.display(), e),
    })?;
    Ok(LoadedDocument {
        id,
        stems: preprocess(&text),
    })
}

fn list_document_files(doc_dir: &Path) -> Result<Vec<std::path::PathBuf>, IrError> {
    let mut files = Vec::new();
    let entries = fs::read_dir(doc_dir).map_err(|e| IrError::BadArguments {
        message: format!("cannot read document directory {}: {}", doc_dir.display(), e),
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| IrError::BadArguments {
            message: format!("error walking document directory: {}", e),
        })?;
        if entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(feature = "parallel")]
fn load_all_documents(
    files: &[std::path::PathBuf],
    preprocess: &(dyn Fn(&str) -> BTreeSet<String> + Sync),
) -> Result<Vec<LoadedDocument>, IrError> {
    let pb = ProgressBar::new(files.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} indexing [{bar:40.cyan/dim}] {pos}/{len}") {
        pb.set_style(style.progress_chars("━━╸"));
    }
    let result: Result<Vec<LoadedDocument>, IrError> = files
        .par_iter()
        .map(|path| {
            let doc = load_document(path, preprocess);
            pb.inc(1);
            doc
        })
        .collect();
    pb.finish_and_clear();
    result
}

#[cfg(not(feature = "parallel"))]
fn load_all_documents(
    files: &[std::path::PathBuf],
    preprocess: &(dyn Fn(&str) -> BTreeSet<String> + Sync),
) -> Result<Vec<LoadedDocument>, IrError> {
    files.iter().map(|path| load_document(path, preprocess)).collect()
}

/// Walk `doc_dir`, preprocess every file, and return `(stem, sorted
/// postings)` entries in the order the store should write them: the
/// universal stem first (offset 0), then every real stem, sorted for
/// determinism.
pub fn build_index(
    doc_dir: &Path,
    preprocess: &(dyn Fn(&str) -> BTreeSet<String> + Sync),
) -> Result<Vec<(String, Vec<PostingId>)>, IrError> {
    let files = list_document_files(doc_dir)?;
    let documents = load_all_documents(&files, preprocess)?;

    let mut by_stem: BTreeMap<String, BTreeSet<PostingId>> = BTreeMap::new();
    let mut universe: BTreeSet<PostingId> = BTreeSet::new();

    for doc in &documents {
        universe.insert(doc.id);
        for stem in &doc.stems {
            by_stem.entry(stem.clone()).or_default().insert(doc.id);
        }
    }

    let mut entries = Vec::with_capacity(by_stem.len() + 1);
    entries.push((
        UNIVERSAL_STEM.to_string(),
        universe.into_iter().collect::<Vec<_>>(),
    ));
    for (stem, ids) in by_stem {
        entries.push((stem, ids.into_iter().collect()));
    }
    Ok(entries)
}
