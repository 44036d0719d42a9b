//! Subset construction algorithm for converting an ε-NFA to a DFA.

use crate::dfa::Dfa;
use crate::nfa::{Nfa, NfaState};
use indexmap::IndexSet;
use std::collections::VecDeque;

/// Canonical DFA state name for a set of NFA states.
///
/// Member names are sorted lexicographically before joining, so any
/// discovery order for the same set yields the same name. This is what
/// deduplicates subsets during construction.
fn set_to_state_name(states: &IndexSet<String>) -> String {
    let mut names: Vec<&str> = states.iter().map(String::as_str).collect();
    names.sort_unstable();
    format!("DFA_{}", names.join("_"))
}

/// Whether any member of the set accepts in the NFA.
fn any_terminating(nfa: &Nfa, states: &IndexSet<String>) -> bool {
    states
        .iter()
        .any(|name| nfa.state(name).is_some_and(NfaState::is_terminating))
}

/// Convert an ε-NFA to a DFA using the subset construction.
///
/// Each DFA state stands for the set of NFA states the machine could
/// occupy at once. Exploration starts from the epsilon closure of the
/// NFA's starting state and proceeds breadth-first. A symbol whose move
/// yields the empty set gets no transition, leaving the transition
/// function partial rather than adding a dead state.
pub fn subset_construction(nfa: &Nfa) -> Dfa {
    let mut dfa = Dfa::new();
    let Some(start) = nfa.starting_state() else {
        // Nothing to explore - return an empty DFA.
        return dfa;
    };

    let alphabet = nfa.alphabet();

    let mut seed = IndexSet::new();
    seed.insert(start.to_string());
    let start_set = nfa.epsilon_closure(&seed);
    let start_name = set_to_state_name(&start_set);

    dfa.set_starting_state(&start_name);
    dfa.set_terminating(&start_name, any_terminating(nfa, &start_set));

    let mut worklist: VecDeque<IndexSet<String>> = VecDeque::new();
    worklist.push_back(start_set);

    while let Some(current) = worklist.pop_front() {
        let current_name = set_to_state_name(&current);

        for &symbol in &alphabet {
            let next = nfa.move_on_symbol(&current, symbol);
            if next.is_empty() {
                continue;
            }

            let next_name = set_to_state_name(&next);
            if !dfa.contains_state(&next_name) {
                dfa.set_terminating(&next_name, any_terminating(nfa, &next));
                worklist.push_back(next);
            }
            dfa.add_transition(&current_name, symbol, &next_name);
        }
    }

    dfa
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_symbol() {
        // S0 -a-> S1(accepting)
        let mut nfa = Nfa::new();
        nfa.add_transition("S0", 'a', "S1");
        nfa.set_starting_state("S0");
        nfa.set_terminating("S1", true);

        let dfa = subset_construction(&nfa);

        assert_eq!(dfa.num_states(), 2);
        assert_eq!(dfa.starting_state(), Some("DFA_S0"));
        assert_eq!(dfa.state("DFA_S0").unwrap().target('a'), Some("DFA_S1"));
        assert!(dfa.state("DFA_S1").unwrap().is_terminating());
    }

    #[test]
    fn test_start_closure_names_the_initial_state() {
        // S0 -ε-> S1 -ε-> S2, then S2 -a-> S3(accepting)
        let mut nfa = Nfa::new();
        nfa.add_epsilon_transition("S0", "S1");
        nfa.add_epsilon_transition("S1", "S2");
        nfa.add_transition("S2", 'a', "S3");
        nfa.set_starting_state("S0");
        nfa.set_terminating("S3", true);

        let dfa = subset_construction(&nfa);

        assert_eq!(dfa.starting_state(), Some("DFA_S0_S1_S2"));
        assert_eq!(
            dfa.state("DFA_S0_S1_S2").unwrap().target('a'),
            Some("DFA_S3")
        );
    }

    #[test]
    fn test_converging_paths_share_one_state() {
        // S0 -a-> S1, S0 -a-> S2, S1 -b-> S3(accepting), S2 -b-> S3
        let mut nfa = Nfa::new();
        nfa.add_transition("S0", 'a', "S1");
        nfa.add_transition("S0", 'a', "S2");
        nfa.add_transition("S1", 'b', "S3");
        nfa.add_transition("S2", 'b', "S3");
        nfa.set_starting_state("S0");
        nfa.set_terminating("S3", true);

        let dfa = subset_construction(&nfa);

        // {S1, S2} collapses into a single DFA state.
        assert_eq!(dfa.num_states(), 3);
        assert_eq!(dfa.state("DFA_S0").unwrap().target('a'), Some("DFA_S1_S2"));
        assert_eq!(
            dfa.state("DFA_S1_S2").unwrap().target('b'),
            Some("DFA_S3")
        );
        assert!(dfa.state("DFA_S3").unwrap().is_terminating());
    }

    #[test]
    fn test_no_transition_on_dead_symbol() {
        // 'b' only leaves S1, so the start state has no 'b' transition.
        let mut nfa = Nfa::new();
        nfa.add_transition("S0", 'a', "S1");
        nfa.add_transition("S1", 'b', "S2");
        nfa.set_starting_state("S0");
        nfa.set_terminating("S2", true);

        let dfa = subset_construction(&nfa);

        assert!(dfa.state("DFA_S0").unwrap().target('b').is_none());
        assert!(dfa.state("DFA_S0").unwrap().target('a').is_some());
    }

    #[test]
    fn test_accepting_membership_carries_over() {
        // The start closure contains the accepting state, so the initial
        // DFA state accepts the empty string.
        let mut nfa = Nfa::new();
        nfa.add_epsilon_transition("S0", "S1");
        nfa.add_transition("S1", 'a', "S1");
        nfa.set_starting_state("S0");
        nfa.set_terminating("S1", true);

        let dfa = subset_construction(&nfa);

        let start = dfa.starting_state().unwrap();
        assert!(dfa.state(start).unwrap().is_terminating());
    }

    #[test]
    fn test_empty_nfa() {
        let dfa = subset_construction(&Nfa::new());
        assert!(dfa.starting_state().is_none());
        assert_eq!(dfa.num_states(), 0);
    }
}
