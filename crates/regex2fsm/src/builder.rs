//! Thompson construction: lowering a syntax tree into an ε-NFA.

use crate::ast::Ast;
use crate::nfa::Nfa;
use std::collections::BTreeSet;

/// A sub-automaton produced while lowering one node: its entry and exit
/// states. Composite nodes wire fragments together with epsilon edges.
#[derive(Debug)]
struct Fragment {
    start: String,
    end: String,
}

/// Builds an ε-NFA from a syntax tree, one numbered state at a time.
#[derive(Debug, Default)]
pub struct NfaBuilder {
    state_counter: usize,
}

impl NfaBuilder {
    /// Create a builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next `S<n>` state name.
    fn fresh_state(&mut self) -> String {
        let name = format!("S{}", self.state_counter);
        self.state_counter += 1;
        name
    }

    /// Lower a syntax tree into an ε-NFA.
    ///
    /// The name counter restarts on every call, so each tree is numbered
    /// from `S0` independently. The root fragment's entry becomes the
    /// starting state and its exit the single accepting state.
    pub fn build(&mut self, ast: &Ast) -> Nfa {
        self.state_counter = 0;
        let mut nfa = Nfa::new();
        let fragment = self.lower(ast, &mut nfa);
        nfa.set_starting_state(&fragment.start);
        nfa.set_terminating(&fragment.end, true);
        nfa
    }

    fn lower(&mut self, node: &Ast, nfa: &mut Nfa) -> Fragment {
        match node {
            Ast::Literal(symbol) => self.lower_literal(nfa, *symbol),
            Ast::Concat(left, right) => self.lower_concat(nfa, left, right),
            Ast::Or(left, right) => self.lower_or(nfa, left, right),
            Ast::Star(inner) => self.lower_star(nfa, inner),
            Ast::Plus(inner) => self.lower_plus(nfa, inner),
            Ast::Optional(inner) => self.lower_optional(nfa, inner),
            Ast::CharacterClass(members) => self.lower_class(nfa, members),
        }
    }

    /// `start -symbol-> end`
    fn lower_literal(&mut self, nfa: &mut Nfa, symbol: char) -> Fragment {
        let start = self.fresh_state();
        let end = self.fresh_state();
        nfa.add_state(&start, false);
        nfa.add_state(&end, false);
        nfa.add_transition(&start, symbol, &end);
        Fragment { start, end }
    }

    /// The left exit feeds the right entry through an epsilon edge; no new
    /// states are needed.
    fn lower_concat(&mut self, nfa: &mut Nfa, left: &Ast, right: &Ast) -> Fragment {
        let left_fragment = self.lower(left, nfa);
        let right_fragment = self.lower(right, nfa);
        nfa.add_epsilon_transition(&left_fragment.end, &right_fragment.start);
        Fragment {
            start: left_fragment.start,
            end: right_fragment.end,
        }
    }

    /// A fresh entry fans out to both branches and both exits rejoin at a
    /// fresh exit.
    fn lower_or(&mut self, nfa: &mut Nfa, left: &Ast, right: &Ast) -> Fragment {
        let start = self.fresh_state();
        let end = self.fresh_state();
        let left_fragment = self.lower(left, nfa);
        let right_fragment = self.lower(right, nfa);
        nfa.add_state(&start, false);
        nfa.add_state(&end, false);
        nfa.add_epsilon_transition(&start, &left_fragment.start);
        nfa.add_epsilon_transition(&start, &right_fragment.start);
        nfa.add_epsilon_transition(&left_fragment.end, &end);
        nfa.add_epsilon_transition(&right_fragment.end, &end);
        Fragment { start, end }
    }

    /// A skip edge for zero repetitions plus a back edge for repeating.
    fn lower_star(&mut self, nfa: &mut Nfa, inner: &Ast) -> Fragment {
        let start = self.fresh_state();
        let end = self.fresh_state();
        let inner_fragment = self.lower(inner, nfa);
        nfa.add_state(&start, false);
        nfa.add_state(&end, false);
        nfa.add_epsilon_transition(&start, &end);
        nfa.add_epsilon_transition(&start, &inner_fragment.start);
        nfa.add_epsilon_transition(&inner_fragment.end, &inner_fragment.start);
        nfa.add_epsilon_transition(&inner_fragment.end, &end);
        Fragment { start, end }
    }

    /// Like star but without the skip edge: at least one pass is required.
    fn lower_plus(&mut self, nfa: &mut Nfa, inner: &Ast) -> Fragment {
        let start = self.fresh_state();
        let end = self.fresh_state();
        let inner_fragment = self.lower(inner, nfa);
        nfa.add_state(&start, false);
        nfa.add_state(&end, false);
        nfa.add_epsilon_transition(&start, &inner_fragment.start);
        nfa.add_epsilon_transition(&inner_fragment.end, &end);
        nfa.add_epsilon_transition(&inner_fragment.end, &inner_fragment.start);
        Fragment { start, end }
    }

    /// A skip edge or a single pass through the inner automaton.
    fn lower_optional(&mut self, nfa: &mut Nfa, inner: &Ast) -> Fragment {
        let start = self.fresh_state();
        let end = self.fresh_state();
        let inner_fragment = self.lower(inner, nfa);
        nfa.add_state(&start, false);
        nfa.add_state(&end, false);
        nfa.add_epsilon_transition(&start, &end);
        nfa.add_epsilon_transition(&start, &inner_fragment.start);
        nfa.add_epsilon_transition(&inner_fragment.end, &end);
        Fragment { start, end }
    }

    /// One transition per member symbol between a shared state pair.
    fn lower_class(&mut self, nfa: &mut Nfa, members: &BTreeSet<char>) -> Fragment {
        let start = self.fresh_state();
        let end = self.fresh_state();
        nfa.add_state(&start, false);
        nfa.add_state(&end, false);
        for &symbol in members {
            nfa.add_transition(&start, symbol, &end);
        }
        Fragment { start, end }
    }
}
