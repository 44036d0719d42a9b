//! End-to-end checks over the full compilation pipeline.
//!
//! The reference simulators here walk the produced automata directly, so
//! every pattern is checked three ways: NFA simulation, DFA walk, and
//! minimal-DFA walk must all agree.

use indexmap::IndexSet;
use regex2fsm::{Automata, Dfa, Error, Nfa, compile, minimize};
use serde_json::Value;

const PATTERNS: &[&str] = &[
    "a",
    "ab",
    "a|b",
    "a*",
    "a+b?",
    "(a|b)*abb",
    "[a-c]d",
    "a(bc)*d",
    "x|yz*",
];

/// Reference NFA runner: closure, then move per input symbol.
fn nfa_accepts(nfa: &Nfa, input: &str) -> bool {
    let Some(start) = nfa.starting_state() else {
        return false;
    };
    let mut seed = IndexSet::new();
    seed.insert(start.to_string());
    let mut current = nfa.epsilon_closure(&seed);

    for symbol in input.chars() {
        current = nfa.move_on_symbol(&current, symbol);
        if current.is_empty() {
            return false;
        }
    }

    current
        .iter()
        .any(|name| nfa.state(name).is_some_and(|state| state.is_terminating()))
}

/// Reference DFA runner: at most one transition per symbol, reject when
/// none exists.
fn dfa_accepts(dfa: &Dfa, input: &str) -> bool {
    let Some(mut current) = dfa.starting_state().map(str::to_string) else {
        return false;
    };

    for symbol in input.chars() {
        match dfa.state(&current).and_then(|state| state.target(symbol)) {
            Some(next) => current = next.to_string(),
            None => return false,
        }
    }

    dfa.state(&current)
        .is_some_and(|state| state.is_terminating())
}

/// Every string over `alphabet` with length at most `max_len`, the empty
/// string included.
fn strings_up_to(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for &symbol in alphabet {
                let mut candidate = prefix.clone();
                candidate.push(symbol);
                next.push(candidate);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

/// The symbols a pattern can consume, for exhaustive input enumeration.
fn pattern_alphabet(pattern: &str) -> Vec<char> {
    let mut symbols: Vec<char> = pattern
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    symbols.sort_unstable();
    symbols.dedup();
    symbols
}

#[test]
fn test_three_automata_agree_on_every_input() {
    for pattern in PATTERNS {
        let automata = compile(pattern).unwrap();
        let alphabet = pattern_alphabet(pattern);

        for input in strings_up_to(&alphabet, 4) {
            let by_nfa = nfa_accepts(&automata.nfa, &input);
            let by_dfa = dfa_accepts(&automata.dfa, &input);
            let by_min = dfa_accepts(&automata.min_dfa, &input);
            assert_eq!(
                by_nfa, by_dfa,
                "{pattern}: NFA and DFA disagree on {input:?}"
            );
            assert_eq!(
                by_dfa, by_min,
                "{pattern}: DFA and minimal DFA disagree on {input:?}"
            );
        }
    }
}

#[test]
fn test_single_literal_pipeline() {
    let automata = compile("a").unwrap();

    assert_eq!(automata.state_counts(), (2, 2, 2));
    assert!(dfa_accepts(&automata.min_dfa, "a"));
    assert!(!dfa_accepts(&automata.min_dfa, ""));
    assert!(!dfa_accepts(&automata.min_dfa, "aa"));
}

#[test]
fn test_alternation_collapses_to_two_states() {
    let automata = compile("a|b").unwrap();
    let min = &automata.min_dfa;

    assert_eq!(min.num_states(), 2);

    // Both symbols leave the start for the same accepting state.
    let start = min.starting_state().unwrap();
    let on_a = min.state(start).unwrap().target('a').unwrap();
    let on_b = min.state(start).unwrap().target('b').unwrap();
    assert_eq!(on_a, on_b);
    assert!(min.state(on_a).unwrap().is_terminating());
    assert!(!min.state(start).unwrap().is_terminating());
}

#[test]
fn test_ends_with_abb_has_four_states() {
    let automata = compile("(a|b)*abb").unwrap();

    assert_eq!(automata.min_dfa.num_states(), 4);
    for input in strings_up_to(&['a', 'b'], 6) {
        assert_eq!(
            dfa_accepts(&automata.min_dfa, &input),
            input.ends_with("abb"),
            "on {input:?}"
        );
    }
}

#[test]
fn test_wildcard_matches_only_itself() {
    let automata = compile("a.c").unwrap();

    assert!(dfa_accepts(&automata.min_dfa, "a.c"));
    assert!(!dfa_accepts(&automata.min_dfa, "abc"));
    assert!(!dfa_accepts(&automata.min_dfa, "ac"));
}

#[test]
fn test_state_counts_never_grow_along_the_pipeline() {
    for pattern in PATTERNS {
        let Automata { nfa, dfa, min_dfa } = compile(pattern).unwrap();
        assert!(
            dfa.num_states() <= nfa.num_states(),
            "{pattern}: determinization grew the state count"
        );
        assert!(
            min_dfa.num_states() <= dfa.num_states(),
            "{pattern}: minimization grew the state count"
        );
    }
}

#[test]
fn test_minimizing_again_changes_nothing() {
    for pattern in PATTERNS {
        let automata = compile(pattern).unwrap();
        let again = minimize(&automata.min_dfa).unwrap();
        assert_eq!(
            again.num_states(),
            automata.min_dfa.num_states(),
            "{pattern}: second minimization changed the state count"
        );
    }
}

#[test]
fn test_dfa_json_transitions_are_single_valued() {
    let automata = compile("(a|b)*abb").unwrap();

    for json in [
        automata.dfa.to_json().unwrap(),
        automata.min_dfa.to_json().unwrap(),
    ] {
        let value: Value = serde_json::from_str(&json).unwrap();
        for (key, state) in value.as_object().unwrap() {
            if key == "startingState" {
                assert!(state.is_string());
                continue;
            }
            for (field, entry) in state.as_object().unwrap() {
                if field == "isTerminatingState" {
                    assert!(entry.is_boolean());
                } else {
                    assert!(entry.is_string(), "transition {field:?} must be one target");
                }
            }
        }
    }
}

#[test]
fn test_nfa_json_uses_arrays_and_omits_empty_epsilon() {
    let automata = compile("a|b").unwrap();
    let value: Value =
        serde_json::from_str(&automata.nfa.to_json().unwrap()).unwrap();

    let mut saw_epsilon = false;
    for (key, state) in value.as_object().unwrap() {
        if key == "startingState" {
            continue;
        }
        for (field, entry) in state.as_object().unwrap() {
            match field.as_str() {
                "isTerminatingState" => assert!(entry.is_boolean()),
                "epsilon" => {
                    saw_epsilon = true;
                    assert!(!entry.as_array().unwrap().is_empty());
                }
                _ => assert!(entry.is_array(), "symbol {field:?} must map to an array"),
            }
        }
    }
    assert!(saw_epsilon, "an alternation NFA must have epsilon edges");
}

#[test]
fn test_serialized_names_start_at_s0() {
    for pattern in PATTERNS {
        let automata = compile(pattern).unwrap();
        for json in [
            automata.nfa.to_json().unwrap(),
            automata.dfa.to_json().unwrap(),
            automata.min_dfa.to_json().unwrap(),
        ] {
            let value: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["startingState"], "S0", "{pattern}");
            for key in value.as_object().unwrap().keys() {
                if key == "startingState" {
                    continue;
                }
                assert!(
                    key.strip_prefix('S')
                        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit())),
                    "{pattern}: unexpected state name {key:?}"
                );
            }
        }
    }
}

#[test]
fn test_front_end_rejects_malformed_patterns() {
    for pattern in ["(", "*", "[]", "a)"] {
        match compile(pattern) {
            Err(Error::InvalidPattern(_) | Error::Parse(_)) => {}
            other => panic!("expected front-end rejection for {pattern:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_empty_pattern_is_a_parse_error() {
    assert!(matches!(compile(""), Err(Error::Parse(_))));
}
