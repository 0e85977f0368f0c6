// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! External preprocessor: text in, deduplicated set of lower-case Porter
//! stems out.
//!
//! Never imported by the core library modules (`skiplist`, `postings`,
//! `store`, `query`, `parse_tree`, `operators`, `evaluator`) — only the
//! `indexer`/`search` binaries wire this in, so the evaluation core stays
//! free of any NLP dependency.
//!
//! Pipeline: split into sentences, split each sentence into words, fold
//! case, drop stop words and anything that isn't purely alphabetic, Porter
//! stem what's left, and collect into a set (a document mentioning "cats"
//! five times contributes the stem once).

use std::collections::{BTreeSet, HashSet};

use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

const STOPWORDS: &str = include_str!("../data/stopwords.txt");

fn stopwords() -> &'static HashSet<&'static str> {
    static CELL: std::sync::OnceLock<HashSet<&'static str>> = std::sync::OnceLock::new();
    CELL.get_or_init(|| STOPWORDS.lines().map(str::trim).filter(|w| !w.is_empty()).collect())
}

fn is_alphabetic_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}

/// Preprocess a document's (or query's) full text into a deduplicated,
/// ordered set of stems, ready to intersect against a dictionary.
pub fn preprocess(text: &str) -> BTreeSet<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    let stop = stopwords();

    let mut stems = BTreeSet::new();
    for sentence in text.unicode_sentences() {
        for word in sentence.unicode_words() {
            let lower = word.to_lowercase();
            if !is_alphabetic_word(&lower) || stop.contains(lower.as_str()) {
                continue;
            }
            stems.insert(stemmer.stem(&lower).into_owned());
        }
    }
    stems
}
