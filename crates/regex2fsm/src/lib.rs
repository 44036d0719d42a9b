//! Compile restricted regular expressions into executable automata.
//!
//! The pipeline runs in five stages:
//!
//! 1. [`lexer::tokenize`] validates the raw pattern, inserts explicit `$`
//!    concatenation markers, and maps each character to a token.
//! 2. [`parser::parse`] runs recursive descent over the token stream and
//!    yields an [`ast::Ast`].
//! 3. [`builder::NfaBuilder`] lowers the tree into an ε-NFA by Thompson
//!    construction.
//! 4. [`subset_construction::subset_construction`] determinizes the NFA.
//! 5. [`minimize::minimize`] refines the DFA down to its minimal form.
//!
//! Every automaton serializes to a JSON object keyed by state name, with
//! the starting state renumbered to `S0`.
//!
//! ```
//! let automata = regex2fsm::compile("(a|b)*abb")?;
//! assert_eq!(automata.min_dfa.num_states(), 4);
//! println!("{}", automata.min_dfa.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
pub mod builder;
pub mod dfa;
pub mod lexer;
pub mod minimize;
pub mod nfa;
pub mod parser;
pub mod pipeline;
pub mod service;
pub mod subset_construction;

pub use ast::Ast;
pub use builder::NfaBuilder;
pub use dfa::{Dfa, DfaState};
pub use lexer::{InvalidPatternError, Token, TokenKind, preprocess, tokenize};
pub use minimize::{MinimizeError, minimize};
pub use nfa::{Nfa, NfaState};
pub use parser::{ParseError, parse};
pub use pipeline::{Automata, compile};
pub use subset_construction::subset_construction;

use thiserror::Error;

/// Any failure the compilation pipeline can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// The raw pattern failed validation or token mapping.
    #[error(transparent)]
    InvalidPattern(#[from] InvalidPatternError),
    /// The token stream does not satisfy the grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Minimization rejected the DFA.
    #[error(transparent)]
    Minimize(#[from] MinimizeError),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
