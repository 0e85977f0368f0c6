// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts: debug-only invariant checks for the skip list and the
//! evaluator.
//!
//! These are zero-cost in release builds (`debug_assert!`) and exist to
//! catch invariant violations during development rather than to prove
//! anything at compile time.

use crate::skiplist::SkipList;

/// Check the three skip-list invariants documented on [`SkipList`]:
/// strictly increasing data, skip pointers only at the configured stride,
/// and every skip target strictly greater than its source.
#[inline]
pub fn check_skiplist_invariants(list: &SkipList) {
    let xs = list.to_list();
    debug_assert!(
        xs.windows(2).all(|w| w[0] < w[1]),
        "Invariant violation: skip list postings are not strictly increasing: {:?}",
        xs
    );

    let expected_skips = match list.stride() {
        Some(stride) => {
            let stride = stride.get();
            let mut count = 0;
            let mut i = 0;
            while i + stride < list.get_length() {
                count += 1;
                i += stride;
            }
            count
        }
        None => 0,
    };
    debug_assert_eq!(
        list.skip_pointer_count(),
        expected_skips,
        "Invariant violation: expected {} skip pointers for length {}, found {}",
        expected_skips,
        list.get_length(),
        list.skip_pointer_count()
    );

    let mut cursor = list.get_head();
    while let Some(d) = cursor.data() {
        if let Some(skip) = cursor.skip() {
            debug_assert!(
                skip.data().unwrap() > d,
                "Invariant violation: skip pointer from {} targets non-advancing node {:?}",
                d,
                skip.data()
            );
        }
        cursor = cursor.next();
    }
}

/// Check that an operator result over two operands is a subset/superset of
/// each as appropriate. `is_subset_of_both` is true for `intersect`, false
/// for `union` (where the relation is reversed).
#[inline]
pub fn check_operator_output_sorted_and_distinct(result: &[u32]) {
    debug_assert!(
        result.windows(2).all(|w| w[0] < w[1]),
        "Invariant violation: boolean operator output is not sorted/distinct: {:?}",
        result
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_list_passes() {
        let list = SkipList::build_from(&(0..20).collect::<Vec<_>>());
        check_skiplist_invariants(&list);
    }

    #[test]
    fn sorted_distinct_output_passes() {
        check_operator_output_sorted_and_distinct(&[1, 2, 5, 9]);
    }

    #[test]
    #[should_panic(expected = "Invariant violation")]
    fn non_distinct_output_panics_in_debug() {
        check_operator_output_sorted_and_distinct(&[1, 1, 2]);
    }
}
