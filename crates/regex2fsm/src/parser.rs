//! Recursive-descent parser for the tokenized pattern grammar.
//!
//! Precedence, lowest to highest:
//!
//! ```text
//! alternation   := concatenation ("|" concatenation)*
//! concatenation := postfix ("$" postfix)*
//! postfix       := atom ("*" | "+" | "?")*
//! atom          := literal | "." | "(" alternation ")" | "[" class "]"
//! ```
//!
//! Both binary forms associate to the left, so `a$b$c` parses as
//! `Concat(Concat(a, b), c)`.

use crate::ast::Ast;
use crate::lexer::{Token, TokenKind};
use std::collections::BTreeSet;
use thiserror::Error;

/// Error returned when a token stream does not satisfy the grammar.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The token stream was empty.
    #[error("empty pattern")]
    EmptyPattern,
    /// An operand or class member was expected but the stream ended.
    #[error("unexpected end of pattern")]
    UnexpectedEnd,
    /// A token appeared where the grammar cannot attach it.
    #[error("unexpected token {0:?}")]
    UnexpectedToken(char),
    /// A `(` group was never closed.
    #[error("unclosed group: missing ')'")]
    UnclosedGroup,
    /// A `[` class was never closed.
    #[error("unterminated character class: missing ']'")]
    UnterminatedClass,
    /// A `[]` class with no members.
    #[error("empty character class")]
    EmptyClass,
    /// A `-` with no symbol on one of its sides.
    #[error("dangling '-' inside character class")]
    DanglingHyphen,
    /// A `x-y` range whose start sorts after its end.
    #[error("invalid character range {start:?}-{end:?}")]
    InvalidRange { start: char, end: char },
    /// An operator token inside a class, e.g. `[a|b]`.
    #[error("token {0:?} is not allowed inside a character class")]
    InvalidClassToken(char),
}

/// Parse a token stream into a syntax tree.
pub fn parse(tokens: &[Token]) -> Result<Ast, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyPattern);
    }

    let mut parser = Parser {
        tokens,
        position: 0,
    };
    let ast = parser.alternation()?;

    // Anything left over is a token the grammar could not attach.
    match parser.peek() {
        Some(token) => Err(ParseError::UnexpectedToken(token.value)),
        None => Ok(ast),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Consume the next token if it has the given kind.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().is_some_and(|t| t.kind == kind) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn alternation(&mut self) -> Result<Ast, ParseError> {
        let mut node = self.concatenation()?;
        while self.eat(TokenKind::Or) {
            let right = self.concatenation()?;
            node = Ast::or(node, right);
        }
        Ok(node)
    }

    fn concatenation(&mut self) -> Result<Ast, ParseError> {
        let mut node = self.postfix()?;
        while self.eat(TokenKind::Concat) {
            let right = self.postfix()?;
            node = Ast::concat(node, right);
        }
        Ok(node)
    }

    fn postfix(&mut self) -> Result<Ast, ParseError> {
        let mut node = self.atom()?;
        loop {
            if self.eat(TokenKind::Star) {
                node = Ast::Star(Box::new(node));
            } else if self.eat(TokenKind::Plus) {
                node = Ast::Plus(Box::new(node));
            } else if self.eat(TokenKind::Optional) {
                node = Ast::Optional(Box::new(node));
            } else {
                return Ok(node);
            }
        }
    }

    fn atom(&mut self) -> Result<Ast, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::UnexpectedEnd);
        };
        match token.kind {
            // The wildcard survives as a plain symbol; it carries no
            // match-anything semantics downstream.
            TokenKind::Literal | TokenKind::Wildcard => Ok(Ast::Literal(token.value)),
            TokenKind::LParen => {
                let node = self.alternation()?;
                if self.eat(TokenKind::RParen) {
                    Ok(node)
                } else {
                    Err(ParseError::UnclosedGroup)
                }
            }
            TokenKind::LBracket => self.character_class(),
            _ => Err(ParseError::UnexpectedToken(token.value)),
        }
    }

    /// Parse the members of a `[...]` class; the `[` is already consumed.
    fn character_class(&mut self) -> Result<Ast, ParseError> {
        let mut members = BTreeSet::new();
        loop {
            let Some(token) = self.advance() else {
                return Err(ParseError::UnterminatedClass);
            };
            match token.kind {
                TokenKind::RBracket => break,
                TokenKind::Literal => {
                    if self.eat(TokenKind::Hyphen) {
                        let start = token.value;
                        let end = self.range_end()?;
                        if start > end {
                            return Err(ParseError::InvalidRange { start, end });
                        }
                        members.extend(start..=end);
                    } else {
                        members.insert(token.value);
                    }
                }
                TokenKind::Hyphen => return Err(ParseError::DanglingHyphen),
                _ => return Err(ParseError::InvalidClassToken(token.value)),
            }
        }
        if members.is_empty() {
            return Err(ParseError::EmptyClass);
        }
        Ok(Ast::CharacterClass(members))
    }

    /// Parse the literal closing an `x-y` range; the `-` is already consumed.
    fn range_end(&mut self) -> Result<char, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::UnterminatedClass);
        };
        match token.kind {
            TokenKind::Literal => Ok(token.value),
            TokenKind::RBracket => Err(ParseError::DanglingHyphen),
            _ => Err(ParseError::InvalidClassToken(token.value)),
        }
    }
}
