//! End-to-end compilation: one pattern in, three automata out.

use crate::builder::NfaBuilder;
use crate::dfa::Dfa;
use crate::minimize::minimize;
use crate::nfa::Nfa;
use crate::subset_construction::subset_construction;
use crate::{Result, lexer, parser};

/// The three automata derived from one pattern.
#[derive(Debug, Clone)]
pub struct Automata {
    /// Thompson construction output.
    pub nfa: Nfa,
    /// Subset construction output.
    pub dfa: Dfa,
    /// Minimized DFA.
    pub min_dfa: Dfa,
}

impl Automata {
    /// State counts as (nfa, dfa, minimized).
    pub fn state_counts(&self) -> (usize, usize, usize) {
        (
            self.nfa.num_states(),
            self.dfa.num_states(),
            self.min_dfa.num_states(),
        )
    }
}

/// Run the whole pipeline over one pattern.
///
/// Stages run in a fixed order: tokenize, parse, Thompson construction,
/// subset construction, minimization. The first failing stage aborts the
/// rest; construction stages themselves cannot fail on a parsed tree.
pub fn compile(pattern: &str) -> Result<Automata> {
    let tokens = lexer::tokenize(pattern)?;
    log::trace!("tokens: {tokens:?}");

    let ast = parser::parse(&tokens)?;
    log::trace!("syntax tree: {ast:?}");

    let nfa = NfaBuilder::new().build(&ast);
    log::debug!("thompson construction produced {} states", nfa.num_states());

    let dfa = subset_construction(&nfa);
    log::debug!("subset construction produced {} states", dfa.num_states());

    let min_dfa = minimize(&dfa)?;
    log::debug!("minimization left {} states", min_dfa.num_states());

    Ok(Automata { nfa, dfa, min_dfa })
}
