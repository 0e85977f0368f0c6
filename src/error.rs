// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core error type for the indexer and searcher.
//!
//! No `thiserror`/`anyhow` here by design: a small closed set of fatal
//! conditions is easier to match on and report than it is to wrap, and the
//! rest of this crate follows the same hand-rolled `Display`/`Error` idiom.

use std::fmt;

/// Fatal conditions that can arise while building or querying an index.
///
/// `UnknownStem` is deliberately not a variant here: a query term with no
/// dictionary entry resolves to an empty [`crate::skiplist::SkipList`]
/// rather than propagating as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    /// A CLI flag was missing, duplicated, or otherwise malformed, or a
    /// document filename did not parse as a non-negative integer.
    BadArguments { message: String },
    /// Unbalanced parentheses in a query.
    MismatchedParens { query: String },
    /// The postfix token stream underflowed the operand stack, or the
    /// evaluator reached a state with no eligible reduction.
    MalformedQuery { query: String, reason: String },
    /// A postings record's framing did not match its declared length, its
    /// checksum did not match, or `complement` observed a posting absent
    /// from the universal list.
    CorruptIndex { detail: String },
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrError::BadArguments { message } => write!(f, "bad arguments: {}", message),
            IrError::MismatchedParens { query } => {
                write!(f, "mismatched parentheses in query: {:?}", query)
            }
            IrError::MalformedQuery { query, reason } => {
                write!(f, "malformed query {:?}: {}", query, reason)
            }
            IrError::CorruptIndex { detail } => write!(f, "corrupt index: {}", detail),
        }
    }
}

impl std::error::Error for IrError {}

impl IrError {
    /// Process exit code this error should produce at the CLI boundary.
    pub fn exit_code(&self) -> i32 {
        match self {
            IrError::BadArguments { .. } => 2,
            IrError::MismatchedParens { .. }
            | IrError::MalformedQuery { .. }
            | IrError::CorruptIndex { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_arguments_exits_2() {
        let e = IrError::BadArguments {
            message: "missing -i".to_string(),
        };
        assert_eq!(e.exit_code(), 2);
        assert!(e.to_string().contains("missing -i"));
    }

    #[test]
    fn other_kinds_exit_1() {
        assert_eq!(
            IrError::MismatchedParens {
                query: "(a".to_string()
            }
            .exit_code(),
            1
        );
        assert_eq!(
            IrError::MalformedQuery {
                query: "a and".to_string(),
                reason: "operand stack underflow".to_string()
            }
            .exit_code(),
            1
        );
        assert_eq!(
            IrError::CorruptIndex {
                detail: "checksum mismatch".to_string()
            }
            .exit_code(),
            1
        );
    }
}
