// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parse tree built from a postfix query, with parent back-pointers and
//! in-place leaf rewrite.
//!
//! Nodes live in a flat arena (`Vec<ParseNode>`) addressed by `usize`
//! handles rather than owned boxes linked by real pointers: a node that
//! owned its parent while being owned by it would be a reference cycle, and
//! Rust has no safe way to express that without `Rc`/`Weak` bookkeeping.
//! Handles sidestep the problem entirely and still give O(1) rewrite of an
//! internal node into a leaf (just overwrite its `kind`).

use crate::error::IrError;
use crate::query::{Operator, Token};
use crate::skiplist::SkipList;

type Handle = usize;

#[derive(Debug)]
enum NodeKind {
    Leaf(SkipList),
    Unary(Operator, Handle),
    Binary(Operator, Handle, Handle),
}

#[derive(Debug)]
struct ParseNode {
    kind: NodeKind,
    parent: Option<Handle>,
}

/// A parse tree owning an arena of nodes and a root handle. Created per
/// query by [`build_from_postfix`]; discarded after [`crate::evaluator`]
/// reduces it to a single leaf.
#[derive(Debug)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
    root: Handle,
}

/// Build a parse tree from a postfix token sequence, loading each term's
/// posting list via `load_stem` as it is encountered.
///
/// `and`/`or` pop right then left (so `left`/`right` preserve source
/// order); `not` pops one operand. Running out of operands, or ending with
/// more than one node left on the stack, is [`IrError::MalformedQuery`].
pub fn build_from_postfix(
    postfix: &[Token],
    original_query: &str,
    mut load_stem: impl FnMut(&str) -> Result<SkipList, IrError>,
) -> Result<ParseTree, IrError> {
    let malformed = |reason: &str| IrError::MalformedQuery {
        query: original_query.to_string(),
        reason: reason.to_string(),
    };

    let mut nodes: Vec<ParseNode> = Vec::new();
    let mut stack: Vec<Handle> = Vec::new();

    for token in postfix {
        match token {
            Token::Term(stem) => {
                let list = load_stem(stem)?;
                nodes.push(ParseNode {
                    kind: NodeKind::Leaf(list),
                    parent: None,
                });
                stack.push(nodes.len() - 1);
            }
            Token::Op(Operator::Not) => {
                let child = stack
                    .pop()
                    .ok_or_else(|| malformed("`not` with no operand on the stack"))?;
                nodes.push(ParseNode {
                    kind: NodeKind::Unary(Operator::Not, child),
                    parent: None,
                });
                let idx = nodes.len() - 1;
                nodes[child].parent = Some(idx);
                stack.push(idx);
            }
            Token::Op(op @ (Operator::And | Operator::Or)) => {
                let right = stack
                    .pop()
                    .ok_or_else(|| malformed("binary operator missing right operand"))?;
                let left = stack
                    .pop()
                    .ok_or_else(|| malformed("binary operator missing left operand"))?;
                nodes.push(ParseNode {
                    kind: NodeKind::Binary(*op, left, right),
                    parent: None,
                });
                let idx = nodes.len() - 1;
                nodes[left].parent = Some(idx);
                nodes[right].parent = Some(idx);
                stack.push(idx);
            }
            Token::LParen | Token::RParen => {
                return Err(malformed("parenthesis token survived shunting-yard"));
            }
        }
    }

    if stack.len() != 1 {
        return Err(malformed(&format!(
            "postfix sequence left {} operands on the stack, expected 1",
            stack.len()
        )));
    }

    Ok(ParseTree {
        nodes,
        root: stack[0],
    })
}

impl ParseTree {
    /// Handles of every leaf currently reachable from the root, in
    /// left-to-right tree order. Nodes orphaned by a previous
    /// [`ParseTree::replace_with_leaf`] call are not reachable and so do
    /// not appear.
    pub fn leaves(&self) -> Vec<Handle> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, at: Handle, out: &mut Vec<Handle>) {
        match &self.nodes[at].kind {
            NodeKind::Leaf(_) => out.push(at),
            NodeKind::Unary(_, child) => self.collect_leaves(*child, out),
            NodeKind::Binary(_, left, right) => {
                self.collect_leaves(*left, out);
                self.collect_leaves(*right, out);
            }
        }
    }

    pub fn is_leaf(&self, handle: Handle) -> bool {
        matches!(self.nodes[handle].kind, NodeKind::Leaf(_))
    }

    pub fn leaf_data(&self, handle: Handle) -> &SkipList {
        match &self.nodes[handle].kind {
            NodeKind::Leaf(list) => list,
            _ => panic!("leaf_data called on a non-leaf node"),
        }
    }

    pub fn parent(&self, handle: Handle) -> Option<Handle> {
        self.nodes[handle].parent
    }

    pub fn is_root(&self, handle: Handle) -> bool {
        handle == self.root
    }

    /// The shape of `handle`'s parent, for the evaluator to decide which
    /// reduction to apply. Returns `None` if `handle` is the root (no
    /// parent to reduce into).
    pub fn parent_shape(&self, handle: Handle) -> Option<ParentShape> {
        let parent = self.nodes[handle].parent?;
        Some(match self.nodes[parent].kind {
            NodeKind::Unary(op, child) => ParentShape::Unary { parent, op, child },
            NodeKind::Binary(op, left, right) => ParentShape::Binary {
                parent,
                op,
                left,
                right,
            },
            NodeKind::Leaf(_) => unreachable!("a leaf cannot be recorded as another node's parent"),
        })
    }

    /// Rewrite `handle` in place into `Leaf(result)`, the operator
    /// evaluator's core reduction step. The node's previous children
    /// become unreachable (never visited by [`ParseTree::leaves`] again)
    /// but remain in the arena; they are dropped along with the tree.
    pub fn replace_with_leaf(&mut self, handle: Handle, result: SkipList) {
        self.nodes[handle].kind = NodeKind::Leaf(result);
    }

    /// The tree's current root. After enough reductions this is itself a
    /// leaf, at which point [`ParseTree::leaf_data`] on it is the final
    /// answer.
    pub fn root(&self) -> Handle {
        self.root
    }
}

/// The shape of a node's parent, as seen by the evaluator.
pub enum ParentShape {
    Unary {
        parent: Handle,
        op: Operator,
        child: Handle,
    },
    Binary {
        parent: Handle,
        op: Operator,
        left: Handle,
        right: Handle,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::compile;

    fn leaf_loader(n: u32) -> impl FnMut(&str) -> Result<SkipList, IrError> {
        move |_stem| Ok(SkipList::build_from(&(0..n).collect::<Vec<_>>()))
    }

    #[test]
    fn single_term_is_root_leaf() {
        let postfix = compile("cat").unwrap();
        let tree = build_from_postfix(&postfix, "cat", leaf_loader(3)).unwrap();
        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.leaves(), vec![tree.root()]);
    }

    #[test]
    fn binary_expression_has_two_leaves() {
        let postfix = compile("cat and dog").unwrap();
        let tree = build_from_postfix(&postfix, "cat and dog", leaf_loader(2)).unwrap();
        assert!(!tree.is_leaf(tree.root()));
        assert_eq!(tree.leaves().len(), 2);
        for leaf in tree.leaves() {
            assert!(tree.parent(leaf).is_some());
            assert_eq!(tree.parent(leaf).unwrap(), tree.root());
        }
    }

    #[test]
    fn unary_not_has_one_leaf() {
        let postfix = compile("not cat").unwrap();
        let tree = build_from_postfix(&postfix, "not cat", leaf_loader(2)).unwrap();
        assert_eq!(tree.leaves().len(), 1);
        match tree.parent_shape(tree.leaves()[0]) {
            Some(ParentShape::Unary { op, .. }) => assert_eq!(op, Operator::Not),
            _ => panic!("expected unary parent"),
        }
    }

    #[test]
    fn replace_with_leaf_hides_old_children() {
        let postfix = compile("cat and dog").unwrap();
        let mut tree = build_from_postfix(&postfix, "cat and dog", leaf_loader(2)).unwrap();
        let root = tree.root();
        tree.replace_with_leaf(root, SkipList::build_from(&[0, 1]));
        assert!(tree.is_leaf(root));
        assert_eq!(tree.leaves(), vec![root]);
    }

    #[test]
    fn dangling_operator_is_malformed_query() {
        // Hand-build a postfix sequence shunting-yard would never itself
        // produce, to exercise the stack-underflow guard directly.
        let postfix = vec![Token::Op(Operator::And)];
        let err = build_from_postfix(&postfix, "and", leaf_loader(1)).unwrap_err();
        assert!(matches!(err, IrError::MalformedQuery { .. }));
    }

    #[test]
    fn leftover_operands_is_malformed_query() {
        let postfix = vec![Token::Term("a".to_string()), Token::Term("b".to_string())];
        let err = build_from_postfix(&postfix, "a b", leaf_loader(1)).unwrap_err();
        assert!(matches!(err, IrError::MalformedQuery { .. }));
    }
}
