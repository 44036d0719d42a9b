//! DFA minimization: unreachable-state removal followed by partition
//! refinement down to a fixed point.

use crate::dfa::{Dfa, DfaState};
use indexmap::IndexMap;
use std::collections::{BTreeSet, VecDeque};
use thiserror::Error;

/// Error returned when a DFA cannot be minimized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MinimizeError {
    /// The starting state belongs to no partition block. This cannot
    /// happen for automata assembled through this crate's constructors;
    /// it guards against hand-built input with a dangling start pointer.
    #[error("starting state was not found in any partition block")]
    StartStateMissing,
}

/// A block of states currently considered equivalent. The ordered set
/// makes the block's first member a deterministic representative.
type Block = BTreeSet<String>;

/// Minimize a DFA.
///
/// Unreachable states are dropped first. The survivors start out split
/// into accepting and non-accepting blocks, and each pass splits every
/// block whose members disagree on where a symbol leads, until a pass
/// changes nothing. Each final block collapses into one `P<i>` state.
///
/// The input is left untouched; the result is a new automaton.
pub fn minimize(dfa: &Dfa) -> Result<Dfa, MinimizeError> {
    let mut trimmed = dfa.clone();

    // Capture the alphabet before trimming; a symbol used only by
    // unreachable states never splits a block of reachable ones.
    let alphabet = trimmed.alphabet();
    remove_unreachable_states(&mut trimmed);

    if trimmed.num_states() == 0 {
        return Ok(trimmed);
    }

    let mut blocks = initial_blocks(&trimmed);
    loop {
        let refined = refine(&trimmed, &blocks, &alphabet);
        if same_blocks(&refined, &blocks) {
            break;
        }
        blocks = refined;
    }

    build_minimized(&trimmed, &blocks, &alphabet)
}

/// Drop every state the starting state cannot reach.
fn remove_unreachable_states(dfa: &mut Dfa) {
    let mut reachable: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    if let Some(start) = dfa.starting_state() {
        reachable.insert(start.to_string());
        queue.push_back(start.to_string());
    }

    while let Some(current) = queue.pop_front() {
        let Some(state) = dfa.state(&current) else {
            continue;
        };
        for (_, target) in state.transitions() {
            if !reachable.contains(target) {
                reachable.insert(target.to_string());
                queue.push_back(target.to_string());
            }
        }
    }

    let before = dfa.num_states();
    dfa.retain_states(|name| reachable.contains(name));
    let removed = before - dfa.num_states();
    if removed > 0 {
        log::debug!("dropped {removed} unreachable state(s) before refinement");
    }
}

/// Split states into accepting and non-accepting blocks, omitting an
/// empty side.
fn initial_blocks(dfa: &Dfa) -> Vec<Block> {
    let mut accepting = Block::new();
    let mut non_accepting = Block::new();
    for (name, state) in dfa.states() {
        if state.is_terminating() {
            accepting.insert(name.to_string());
        } else {
            non_accepting.insert(name.to_string());
        }
    }

    let mut blocks = Vec::new();
    if !accepting.is_empty() {
        blocks.push(accepting);
    }
    if !non_accepting.is_empty() {
        blocks.push(non_accepting);
    }
    blocks
}

/// One full refinement pass. Each block with more than one member is
/// split on the first symbol whose destinations disagree; blocks the
/// pass cannot split are carried over whole.
fn refine(dfa: &Dfa, blocks: &[Block], alphabet: &[char]) -> Vec<Block> {
    let mut refined = Vec::new();

    for block in blocks {
        if block.len() <= 1 {
            refined.push(block.clone());
            continue;
        }

        let mut split = None;
        for &symbol in alphabet {
            let groups = split_on_symbol(dfa, block, symbol, blocks);
            if groups.len() > 1 {
                split = Some(groups);
                break;
            }
        }

        match split {
            Some(groups) => refined.extend(groups),
            None => refined.push(block.clone()),
        }
    }

    refined
}

/// Group a block's members by the block their transition on `symbol`
/// lands in. `None` keys the members with no transition at all.
fn split_on_symbol(dfa: &Dfa, block: &Block, symbol: char, blocks: &[Block]) -> Vec<Block> {
    let mut groups: IndexMap<Option<usize>, Block> = IndexMap::new();

    for name in block {
        let destination = dfa
            .state(name)
            .and_then(|state| state.target(symbol))
            .and_then(|target| blocks.iter().position(|candidate| candidate.contains(target)));
        groups.entry(destination).or_default().insert(name.clone());
    }

    groups.into_values().collect()
}

/// Whether two partition lists hold exactly the same blocks.
fn same_blocks(current: &[Block], previous: &[Block]) -> bool {
    current.len() == previous.len() && previous.iter().all(|block| current.contains(block))
}

/// Collapse each block into a single `P<i>` state.
fn build_minimized(dfa: &Dfa, blocks: &[Block], alphabet: &[char]) -> Result<Dfa, MinimizeError> {
    let start = dfa
        .starting_state()
        .ok_or(MinimizeError::StartStateMissing)?;
    let start_block = blocks
        .iter()
        .position(|block| block.contains(start))
        .ok_or(MinimizeError::StartStateMissing)?;

    let mut minimized = Dfa::new();
    minimized.set_starting_state(&format!("P{start_block}"));

    for (index, block) in blocks.iter().enumerate() {
        let name = format!("P{index}");
        let accepts = block
            .iter()
            .any(|member| dfa.state(member).is_some_and(DfaState::is_terminating));
        minimized.set_terminating(&name, accepts);

        // Members are interchangeable by now, so one representative's
        // edges stand in for the whole block.
        let Some(representative) = block.iter().next() else {
            continue;
        };
        for &symbol in alphabet {
            let Some(target) = dfa
                .state(representative)
                .and_then(|state| state.target(symbol))
            else {
                continue;
            };
            if let Some(target_block) = blocks
                .iter()
                .position(|candidate| candidate.contains(target))
            {
                minimized.add_transition(&name, symbol, &format!("P{target_block}"));
            }
        }
    }

    Ok(minimized)
}
