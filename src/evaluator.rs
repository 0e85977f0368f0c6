// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Smallest-operand-first evaluator: drives a [`ParseTree`] down to a
//! single leaf by repeatedly reducing the cheapest eligible subtree.
//!
//! Each iteration enumerates the tree's current leaves, sorts them by
//! posting-list length ascending, and reduces the first one whose parent is
//! "ready" (unary, or binary with a leaf sibling). Reducing a subtree whose
//! sibling is still unevaluated would force an operator to run before its
//! operand is known, so that candidate is skipped in favor of the next
//! smallest leaf. This keeps intermediate result sizes small and
//! maximises the benefit of skip-accelerated intersection — a heuristic,
//! not a correctness requirement: the operators form a commutative,
//! associative algebra on sets, so any valid reduction order reaches the
//! same final answer.

use crate::error::IrError;
use crate::operators::{complement, intersect, union};
use crate::parse_tree::{ParentShape, ParseTree};
use crate::query::Operator;
use crate::skiplist::SkipList;

/// Reduce `tree` to a single leaf and return its [`SkipList`]. `universe`
/// is the collection-wide posting list `not` complements against.
pub fn evaluate(
    tree: &mut ParseTree,
    universe: &SkipList,
    original_query: &str,
) -> Result<SkipList, IrError> {
    loop {
        if tree.is_leaf(tree.root()) {
            return Ok(tree.leaf_data(tree.root()).clone());
        }

        let mut candidates = tree.leaves();
        candidates.sort_by_key(|&h| tree.leaf_data(h).get_length());

        let mut reduced = false;
        for leaf in candidates {
            let Some(shape) = tree.parent_shape(leaf) else {
                continue;
            };

            match shape {
                ParentShape::Unary { parent, op, child } => {
                    debug_assert_eq!(op, Operator::Not, "the only unary operator is `not`");
                    let operand = tree.leaf_data(child).clone();
                    let result = complement(&operand, universe)?;
                    tree.replace_with_leaf(parent, result);
                }
                ParentShape::Binary {
                    parent,
                    op,
                    left,
                    right,
                } => {
                    if !tree.is_leaf(left) || !tree.is_leaf(right) {
                        continue;
                    }
                    let a = tree.leaf_data(left).clone();
                    let b = tree.leaf_data(right).clone();
                    let result = match op {
                        Operator::And => intersect(&a, &b),
                        Operator::Or => union(&a, &b),
                        Operator::Not => unreachable!("`not` is never binary"),
                    };
                    tree.replace_with_leaf(parent, result);
                }
            }
            reduced = true;
            break;
        }

        if !reduced {
            return Err(IrError::MalformedQuery {
                query: original_query.to_string(),
                reason: "no eligible reduction: every leaf's parent has a non-leaf sibling"
                    .to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_tree::build_from_postfix;
    use crate::query::compile;
    use std::collections::HashMap;

    /// The six-document fixture used throughout the spec's worked examples:
    /// 1->{cat,dog}, 2->{cat}, 3->{dog,fish}, 4->{fish}.
    fn fixture() -> (HashMap<&'static str, Vec<u32>>, SkipList) {
        let mut stems = HashMap::new();
        stems.insert("cat", vec![1, 2]);
        stems.insert("dog", vec![1, 3]);
        stems.insert("fish", vec![3, 4]);
        let universe = SkipList::build_from(&[1, 2, 3, 4]);
        (stems, universe)
    }

    fn run_query(query: &str) -> Vec<u32> {
        let (stems, universe) = fixture();
        let postfix = compile(query).unwrap();
        let mut tree = build_from_postfix(&postfix, query, |stem| {
            Ok(SkipList::build_from(stems.get(stem).map(|v| v.as_slice()).unwrap_or(&[])))
        })
        .unwrap();
        evaluate(&mut tree, &universe, query).unwrap().to_list()
    }

    #[test]
    fn cat_and_dog() {
        assert_eq!(run_query("cat and dog"), vec![1]);
    }

    #[test]
    fn cat_or_dog() {
        assert_eq!(run_query("cat or dog"), vec![1, 2, 3]);
    }

    #[test]
    fn not_cat() {
        assert_eq!(run_query("not cat"), vec![3, 4]);
    }

    #[test]
    fn cat_and_not_dog() {
        assert_eq!(run_query("cat and not dog"), vec![2]);
    }

    #[test]
    fn parenthesised_or_then_and_not() {
        assert_eq!(run_query("(cat or fish) and not dog"), vec![2, 4]);
    }

    #[test]
    fn unknown_stem_yields_empty() {
        assert_eq!(run_query("bird"), Vec::<u32>::new());
    }

    #[test]
    fn unknown_stem_in_conjunction_yields_empty() {
        assert_eq!(run_query("cat and bird"), Vec::<u32>::new());
    }

    #[test]
    fn not_of_unknown_stem_yields_universe() {
        assert_eq!(run_query("not bird"), vec![1, 2, 3, 4]);
    }

    #[test]
    fn evaluation_order_is_irrelevant_to_the_final_result() {
        // Same query, evaluated via the left-biased vs. the
        // smallest-first order, must agree: the algebra is
        // commutative/associative regardless of schedule.
        let a = run_query("cat or dog or fish");
        let b = run_query("fish or dog or cat");
        assert_eq!(a, b);
    }
}
