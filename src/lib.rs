// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Boolean information retrieval over a static document collection.
//!
//! An [`indexer`] walks a document directory and writes a dictionary +
//! postings [`store`]; a [`query`] compiler and [`evaluator`] then answer
//! `and`/`or`/`not`/parenthesised boolean queries against that store,
//! driven by skip-accelerated set operators ([`operators`]) over
//! [`skiplist::SkipList`] postings.
//!
//! [`preprocess`] is the only module that reaches outside this crate's own
//! algebra (stemming, word segmentation); the rest of the library never
//! depends on it.

pub mod contracts;
pub mod error;
pub mod evaluator;
pub mod indexer;
pub mod operators;
pub mod parse_tree;
pub mod postings;
pub mod preprocess;
pub mod query;
pub mod skiplist;
pub mod store;

pub use error::IrError;
pub use skiplist::{PostingId, SkipList};
