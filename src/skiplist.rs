// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Posting-list skip list: an ordered sequence of [`PostingId`]s with
//! auxiliary forward pointers spaced ≈√n apart.
//!
//! # References
//!
//! - Pugh, W. (1990). "Skip Lists: A Probabilistic Alternative to Balanced
//!   Trees". Communications of the ACM, 33(6), 668-676. This structure is
//!   the deterministic, posting-list-specific cousin of Pugh's randomized
//!   skip list: instead of randomized level assignment we place exactly one
//!   level of skip pointers at a fixed ⌊√n⌋ stride, which is the classic
//!   layout for accelerating AND-merges of sorted posting lists (Croft,
//!   Metzler & Strohman, "Search Engines", §5.3).
//!
//! Nodes are stored in a flat `Vec` rather than heap-allocated and linked
//! with `Box`/`Rc`: `next` and `skip` are indices into that vector. This
//! avoids the cyclic-ownership problems a doubly-linked node-per-box design
//! would run into and lets `build_from` wire every pointer in one pass.

use std::num::NonZeroUsize;

/// A document identifier. Stable across indexer runs; derived from a
/// document's filename.
pub type PostingId = u32;

/// One node of a [`SkipList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub data: PostingId,
    pub next: Option<usize>,
    pub skip: Option<usize>,
}

/// An immutable-after-build, strictly increasing sequence of [`PostingId`]s
/// with √n-spaced skip pointers.
///
/// # Invariants
///
/// 1. **STRICTLY_INCREASING**: `nodes[i].data < nodes[i+1].data` along the
///    `next` chain.
/// 2. **SKIP_STRIDE**: skip pointers exist only on every ⌊√length⌋-th node
///    (0-indexed from the head), except possibly a short final stride;
///    when present, `skip` targets the node exactly stride positions ahead.
/// 3. **SKIP_ADVANCES**: for any node N with skip target S, `S.data > N.data`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    nodes: Vec<Node>,
    head: Option<usize>,
}

/// A cursor into a [`SkipList`], used by the set operators in
/// [`crate::operators`] instead of exposing raw node indices.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    list: &'a SkipList,
    at: Option<usize>,
}

impl<'a> Cursor<'a> {
    pub fn data(&self) -> Option<PostingId> {
        self.at.map(|i| self.list.nodes[i].data)
    }

    pub fn is_none(&self) -> bool {
        self.at.is_none()
    }

    pub fn next(&self) -> Cursor<'a> {
        Cursor {
            list: self.list,
            at: self.at.and_then(|i| self.list.nodes[i].next),
        }
    }

    /// The node reachable via this cursor's skip pointer, if any.
    pub fn skip(&self) -> Option<Cursor<'a>> {
        self.at.and_then(|i| self.list.nodes[i].skip).map(|i| Cursor {
            list: self.list,
            at: Some(i),
        })
    }
}

impl SkipList {
    /// Build a skip list from a sequence already sorted and deduplicated by
    /// the caller. Never fails; an empty input yields an empty list.
    ///
    /// Stride = ⌊√n⌋. If stride ≥ 2, every node at index `k * stride`
    /// (k = 0, 1, …) gets a skip pointer to the node at `(k + 1) * stride`,
    /// stopping once that target would run past the end of the list.
    pub fn build_from(xs: &[PostingId]) -> SkipList {
        debug_assert!(
            xs.windows(2).all(|w| w[0] < w[1]),
            "build_from requires a strictly increasing, deduplicated input"
        );

        if xs.is_empty() {
            return SkipList::default();
        }

        let mut nodes: Vec<Node> = xs
            .iter()
            .map(|&data| Node {
                data,
                next: None,
                skip: None,
            })
            .collect();

        for i in 0..nodes.len() - 1 {
            nodes[i].next = Some(i + 1);
        }

        let stride = (nodes.len() as f64).sqrt() as usize;
        if stride >= 2 {
            let mut i = 0;
            while i + stride < nodes.len() {
                nodes[i].skip = Some(i + stride);
                i += stride;
            }
        }

        let list = SkipList {
            nodes,
            head: Some(0),
        };
        crate::contracts::check_skiplist_invariants(&list);
        list
    }

    /// Number of postings in the list.
    pub fn get_length(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A cursor positioned at the first node, or a cursor that is
    /// immediately exhausted for an empty list.
    pub fn get_head(&self) -> Cursor<'_> {
        Cursor {
            list: self,
            at: self.head,
        }
    }

    /// Materialise the list as a plain ascending sequence.
    pub fn to_list(&self) -> Vec<PostingId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.get_head();
        while let Some(d) = cursor.data() {
            out.push(d);
            cursor = cursor.next();
        }
        out
    }

    /// Number of skip pointers actually present. Exposed for tests that
    /// check the ⌊√n⌋ spacing property (§8 invariant 5).
    pub fn skip_pointer_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.skip.is_some()).count()
    }

    /// The configured stride, for tests and diagnostics. `None` when the
    /// list is too short to carry skip pointers (stride < 2).
    pub fn stride(&self) -> Option<NonZeroUsize> {
        let stride = (self.nodes.len() as f64).sqrt() as usize;
        if stride >= 2 {
            NonZeroUsize::new(stride)
        } else {
            None
        }
    }
}
