//! Epsilon Non-deterministic Finite Automaton (ε-NFA) over named states.

use indexmap::{IndexMap, IndexSet};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeSet;

/// One state's outgoing edges and acceptance flag.
#[derive(Debug, Clone, Default)]
pub struct NfaState {
    /// Whether the state accepts.
    is_terminating: bool,
    /// Symbol transitions: symbol -> set of destination states.
    transitions: IndexMap<char, IndexSet<String>>,
    /// Epsilon transitions: destinations reachable without consuming input.
    epsilon: IndexSet<String>,
}

impl NfaState {
    /// Whether the state accepts.
    pub fn is_terminating(&self) -> bool {
        self.is_terminating
    }

    /// Destinations on the given symbol, if any.
    pub fn targets(&self, symbol: char) -> Option<&IndexSet<String>> {
        self.transitions.get(&symbol)
    }

    /// All symbol transitions in insertion order.
    pub fn transitions(&self) -> impl Iterator<Item = (char, &IndexSet<String>)> {
        self.transitions.iter().map(|(&symbol, targets)| (symbol, targets))
    }

    /// Destinations reachable through epsilon edges.
    pub fn epsilon_targets(&self) -> &IndexSet<String> {
        &self.epsilon
    }
}

/// An Epsilon Non-deterministic Finite Automaton.
///
/// States are identified by name and kept in insertion order, so repeated
/// runs over the same input produce identical tables and identical JSON.
#[derive(Debug, Clone)]
pub struct Nfa {
    /// Name of the starting state (None until one is set).
    starting_state: Option<String>,
    /// State table: name -> edges and acceptance.
    states: IndexMap<String, NfaState>,
}

impl Nfa {
    /// Create a new empty NFA.
    pub fn new() -> Self {
        Self {
            starting_state: None,
            states: IndexMap::new(),
        }
    }

    /// Ensure a state record exists without touching an existing one.
    fn ensure_state(&mut self, name: &str) {
        if !self.states.contains_key(name) {
            self.states.insert(name.to_string(), NfaState::default());
        }
    }

    /// Add a state, creating or updating its acceptance flag.
    pub fn add_state(&mut self, name: &str, is_terminating: bool) {
        self.states
            .entry(name.to_string())
            .or_default()
            .is_terminating = is_terminating;
    }

    /// Mark a state accepting or rejecting, creating it if missing.
    pub fn set_terminating(&mut self, name: &str, is_terminating: bool) {
        self.add_state(name, is_terminating);
    }

    /// Set the starting state, creating it if missing.
    pub fn set_starting_state(&mut self, name: &str) {
        self.ensure_state(name);
        self.starting_state = Some(name.to_string());
    }

    /// Add a symbol transition. Endpoint states are created on demand and
    /// duplicate edges collapse into one.
    pub fn add_transition(&mut self, source: &str, symbol: char, destination: &str) {
        self.ensure_state(source);
        self.ensure_state(destination);
        if let Some(record) = self.states.get_mut(source) {
            record
                .transitions
                .entry(symbol)
                .or_default()
                .insert(destination.to_string());
        }
    }

    /// Add an epsilon transition from source to destination.
    pub fn add_epsilon_transition(&mut self, source: &str, destination: &str) {
        self.ensure_state(source);
        self.ensure_state(destination);
        if let Some(record) = self.states.get_mut(source) {
            record.epsilon.insert(destination.to_string());
        }
    }

    /// Name of the starting state.
    pub fn starting_state(&self) -> Option<&str> {
        self.starting_state.as_deref()
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&NfaState> {
        self.states.get(name)
    }

    /// Whether a state with this name exists.
    pub fn contains_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// All states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = (&str, &NfaState)> {
        self.states.iter().map(|(name, state)| (name.as_str(), state))
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// All symbols with at least one transition, sorted.
    pub fn alphabet(&self) -> Vec<char> {
        let mut symbols = BTreeSet::new();
        for state in self.states.values() {
            symbols.extend(state.transitions.keys());
        }
        symbols.into_iter().collect()
    }

    /// Compute the epsilon closure of a set of states using DFS.
    ///
    /// The result contains the seed states themselves plus every state
    /// reachable through epsilon edges alone. The closure of the empty set
    /// is empty.
    pub fn epsilon_closure(&self, states: &IndexSet<String>) -> IndexSet<String> {
        let mut closure = states.clone();
        let mut stack: Vec<String> = states.iter().cloned().collect();

        while let Some(state) = stack.pop() {
            let Some(record) = self.states.get(&state) else {
                continue;
            };
            for target in &record.epsilon {
                if closure.insert(target.clone()) {
                    stack.push(target.clone());
                }
            }
        }

        closure
    }

    /// States reachable from a set on a given symbol.
    /// Returns the epsilon closure of the reached states.
    pub fn move_on_symbol(&self, states: &IndexSet<String>, symbol: char) -> IndexSet<String> {
        let mut reached = IndexSet::new();

        for state in states {
            let Some(targets) = self.states.get(state).and_then(|record| record.targets(symbol))
            else {
                continue;
            };
            for target in targets {
                reached.insert(target.clone());
            }
        }

        self.epsilon_closure(&reached)
    }

    /// Return a copy with states renamed to the `S0, S1, ...` wire naming.
    ///
    /// The starting state becomes `S0`; the rest follow in table order. The
    /// automaton itself is left untouched.
    pub fn renumbered(&self) -> Nfa {
        let Some(start) = self.starting_state.as_deref() else {
            return self.clone();
        };

        let mut names: IndexMap<&str, String> = IndexMap::new();
        names.insert(start, "S0".to_string());
        for name in self.states.keys() {
            let next_id = names.len();
            names
                .entry(name.as_str())
                .or_insert_with(|| format!("S{next_id}"));
        }

        let rename = |target: &String| -> String {
            names
                .get(target.as_str())
                .cloned()
                .unwrap_or_else(|| target.clone())
        };

        let mut renamed = Nfa::new();
        renamed.starting_state = Some("S0".to_string());
        for (old_name, new_name) in &names {
            let Some(state) = self.states.get(*old_name) else {
                continue;
            };
            let renamed_state = NfaState {
                is_terminating: state.is_terminating,
                transitions: state
                    .transitions
                    .iter()
                    .map(|(&symbol, targets)| (symbol, targets.iter().map(rename).collect()))
                    .collect(),
                epsilon: state.epsilon.iter().map(rename).collect(),
            };
            renamed.states.insert(new_name.clone(), renamed_state);
        }

        renamed
    }

    /// Serialize as pretty JSON after renumbering to the wire naming.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.renumbered())
    }
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

// Wire format: a single object holding "startingState" plus one entry per
// state. Each state carries "isTerminatingState", one array per symbol, and
// an "epsilon" array only when the state has epsilon edges.
impl Serialize for Nfa {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.states.len() + 1))?;
        map.serialize_entry("startingState", self.starting_state.as_deref().unwrap_or(""))?;
        for (name, state) in &self.states {
            map.serialize_entry(name, state)?;
        }
        map.end()
    }
}

impl Serialize for NfaState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut entries = 1 + self.transitions.len();
        if !self.epsilon.is_empty() {
            entries += 1;
        }
        let mut map = serializer.serialize_map(Some(entries))?;
        map.serialize_entry("isTerminatingState", &self.is_terminating)?;
        for (symbol, targets) in &self.transitions {
            map.serialize_entry(symbol, &targets.iter().collect::<Vec<_>>())?;
        }
        if !self.epsilon.is_empty() {
            map.serialize_entry("epsilon", &self.epsilon.iter().collect::<Vec<_>>())?;
        }
        map.end()
    }
}
