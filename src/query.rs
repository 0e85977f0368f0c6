// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query tokeniser and shunting-yard compiler.
//!
//! Turns a single-line, case-insensitive query string into a postfix
//! (reverse-Polish) token sequence ready for [`crate::parse_tree`].

use crate::error::IrError;

/// The closed set of boolean operators. Dispatch elsewhere in this crate is
/// a single `match` over this enum rather than a name-keyed table of
/// function pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    fn from_word(word: &str) -> Option<Operator> {
        match word {
            "and" => Some(Operator::And),
            "or" => Some(Operator::Or),
            "not" => Some(Operator::Not),
            _ => None,
        }
    }

    /// Higher binds tighter. `not` > `and` > `or`.
    fn precedence(self) -> u8 {
        match self {
            Operator::Not => 2,
            Operator::And => 1,
            Operator::Or => 0,
        }
    }

    /// `not` is the only right-associative operator (`and`/`or` are
    /// left-associative). Shunting-yard must only pop an equal-precedence
    /// operator off the stack for a left-associative op; popping on equal
    /// precedence for `not` would reorder a run of consecutive `not`s.
    fn is_right_associative(self) -> bool {
        matches!(self, Operator::Not)
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Operator::Not)
    }
}

/// One element of a token stream, before or after shunting-yard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Term(String),
    Op(Operator),
    LParen,
    RParen,
}

/// Split a query on ASCII spaces, then peel a leading `(` and/or trailing
/// `)` off each raw token into their own tokens. `(foo)` becomes three
/// tokens: `(`, `foo`, `)`. Recognised operator words become `Token::Op`;
/// everything else is a `Token::Term` carrying the raw (lower-cased) word,
/// to be stemmed by the external preprocessor before compilation.
pub fn tokenize(query: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for raw in query.trim().split(' ').filter(|s| !s.is_empty()) {
        let mut word = raw;
        let mut leading_parens = 0;
        while let Some(rest) = word.strip_prefix('(') {
            leading_parens += 1;
            word = rest;
        }
        let mut trailing_parens = 0;
        while let Some(rest) = word.strip_suffix(')') {
            trailing_parens += 1;
            word = rest;
        }

        for _ in 0..leading_parens {
            tokens.push(Token::LParen);
        }
        if !word.is_empty() {
            let lower = word.to_lowercase();
            tokens.push(match Operator::from_word(&lower) {
                Some(op) => Token::Op(op),
                None => Token::Term(lower),
            });
        }
        for _ in 0..trailing_parens {
            tokens.push(Token::RParen);
        }
    }
    tokens
}

/// Convert an infix token stream to postfix order via shunting-yard,
/// honoring `not` (unary, right-assoc) > `and` (left-assoc) > `or`
/// (left-assoc).
pub fn shunting_yard(tokens: &[Token], original_query: &str) -> Result<Vec<Token>, IrError> {
    let mismatched = || IrError::MismatchedParens {
        query: original_query.to_string(),
    };

    let mut output = Vec::new();
    let mut operators: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Term(_) => output.push(token.clone()),
            Token::LParen => operators.push(Token::LParen),
            Token::RParen => {
                loop {
                    match operators.pop() {
                        Some(Token::LParen) => break,
                        Some(op) => output.push(op),
                        None => return Err(mismatched()),
                    }
                }
            }
            Token::Op(op) => {
                while let Some(Token::Op(top)) = operators.last() {
                    let should_pop = if op.is_right_associative() {
                        top.precedence() > op.precedence()
                    } else {
                        top.precedence() >= op.precedence()
                    };
                    if should_pop {
                        output.push(operators.pop().unwrap());
                    } else {
                        break;
                    }
                }
                operators.push(Token::Op(*op));
            }
        }
    }

    while let Some(top) = operators.pop() {
        if matches!(top, Token::LParen) {
            return Err(mismatched());
        }
        output.push(top);
    }

    Ok(output)
}

/// Tokenise and compile a query string to postfix in one step.
pub fn compile(query: &str) -> Result<Vec<Token>, IrError> {
    let lowered = query.trim().to_lowercase();
    let tokens = tokenize(&lowered);
    shunting_yard(&tokens, query)
}
