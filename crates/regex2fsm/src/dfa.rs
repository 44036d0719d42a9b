//! Deterministic Finite Automaton (DFA) over named states.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeSet;

/// One state's outgoing edges and acceptance flag.
///
/// Transitions map each symbol to exactly one destination, so determinism
/// holds by construction.
#[derive(Debug, Clone, Default)]
pub struct DfaState {
    /// Whether the state accepts.
    is_terminating: bool,
    /// Symbol transitions: symbol -> destination state.
    transitions: IndexMap<char, String>,
}

impl DfaState {
    /// Whether the state accepts.
    pub fn is_terminating(&self) -> bool {
        self.is_terminating
    }

    /// Destination on the given symbol, if any.
    pub fn target(&self, symbol: char) -> Option<&str> {
        self.transitions.get(&symbol).map(String::as_str)
    }

    /// All transitions in insertion order.
    pub fn transitions(&self) -> impl Iterator<Item = (char, &str)> {
        self.transitions
            .iter()
            .map(|(&symbol, target)| (symbol, target.as_str()))
    }
}

/// A Deterministic Finite Automaton.
///
/// Same naming and ordering conventions as [`crate::nfa::Nfa`]: states are
/// identified by name and kept in insertion order.
#[derive(Debug, Clone)]
pub struct Dfa {
    /// Name of the starting state (None until one is set).
    starting_state: Option<String>,
    /// State table: name -> edges and acceptance.
    states: IndexMap<String, DfaState>,
}

impl Dfa {
    /// Create a new empty DFA.
    pub fn new() -> Self {
        Self {
            starting_state: None,
            states: IndexMap::new(),
        }
    }

    /// Ensure a state record exists without touching an existing one.
    fn ensure_state(&mut self, name: &str) {
        if !self.states.contains_key(name) {
            self.states.insert(name.to_string(), DfaState::default());
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

    /// Add a transition. Endpoint states are created on demand; a second
    /// edge on the same symbol replaces the first, keeping the automaton
    /// deterministic.
    pub fn add_transition(&mut self, source: &str, symbol: char, destination: &str) {
        self.ensure_state(source);
        self.ensure_state(destination);
        if let Some(record) = self.states.get_mut(source) {
            record.transitions.insert(symbol, destination.to_string());
        }
    }

    /// Name of the starting state.
    pub fn starting_state(&self) -> Option<&str> {
        self.starting_state.as_deref()
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&DfaState> {
        self.states.get(name)
    }

    /// Whether a state with this name exists.
    pub fn contains_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// All states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = (&str, &DfaState)> {
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

    /// Keep only the states the predicate approves.
    ///
    /// Targets are not rewritten; callers drop only states that no kept
    /// transition points at.
    pub fn retain_states(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.states.retain(|name, _| keep(name));
    }

    /// Return a copy with states renamed to the `S0, S1, ...` wire naming.
    ///
    /// The starting state becomes `S0`; the rest follow in table order. The
    /// automaton itself is left untouched.
    pub fn renumbered(&self) -> Dfa {
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

        let mut renamed = Dfa::new();
        renamed.starting_state = Some("S0".to_string());
        for (old_name, new_name) in &names {
            let Some(state) = self.states.get(*old_name) else {
                continue;
            };
            let renamed_state = DfaState {
                is_terminating: state.is_terminating,
                transitions: state
                    .transitions
                    .iter()
                    .map(|(&symbol, target)| (symbol, rename(target)))
                    .collect(),
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

impl Default for Dfa {
    fn default() -> Self {
        Self::new()
    }
}

// Wire format: a single object holding "startingState" plus one entry per
// state. Each state carries "isTerminatingState" and one string-valued
// entry per symbol; epsilon never appears.
impl Serialize for Dfa {
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

impl Serialize for DfaState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1 + self.transitions.len()))?;
        map.serialize_entry("isTerminatingState", &self.is_terminating)?;
        for (symbol, target) in &self.transitions {
            map.serialize_entry(symbol, target)?;
        }
        map.end()
    }
}
