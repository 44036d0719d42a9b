//! Abstract syntax tree for the restricted regular expression grammar.

use std::collections::BTreeSet;

/// A node of the regular expression syntax tree.
///
/// The grammar is closed: every construct the parser can produce is one of
/// these variants, so the automaton builder can match exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// A single symbol.
    Literal(char),
    /// Two expressions in sequence.
    Concat(Box<Ast>, Box<Ast>),
    /// A choice between two expressions.
    Or(Box<Ast>, Box<Ast>),
    /// Zero or more repetitions.
    Star(Box<Ast>),
    /// One or more repetitions.
    Plus(Box<Ast>),
    /// Zero or one occurrence.
    Optional(Box<Ast>),
    /// A set of alternative symbols, e.g. `[a-z0]`.
    ///
    /// Ranges are expanded at parse time, so the set holds every member
    /// symbol. The ordered set keeps symbol iteration deterministic.
    CharacterClass(BTreeSet<char>),
}

impl Ast {
    /// Wrap two nodes in a concatenation.
    pub fn concat(left: Ast, right: Ast) -> Ast {
        Ast::Concat(Box::new(left), Box::new(right))
    }

    /// Wrap two nodes in an alternation.
    pub fn or(left: Ast, right: Ast) -> Ast {
        Ast::Or(Box::new(left), Box::new(right))
    }
}
