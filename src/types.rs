//! This module defines the core data structures and types used throughout the tracer,
//! including the machine description, transitions, configurations, exploration results
//! and error types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The reserved blank symbol. Machine descriptions use it to name an unwritten cell, and
/// both tape segments are padded with it on demand.
pub const BLANK_SYMBOL: char = '_';
/// The default number of breadth-first levels to explore before timing out.
pub const DEFAULT_MAX_DEPTH: usize = 1000;
/// The default upper bound on the number of configurations generated in one search.
pub const DEFAULT_MAX_CONFIGURATIONS: usize = 1_000_000;
/// The maximum allowed size for a machine description in bytes.
pub const MAX_PROGRAM_SIZE: usize = 1 << 20; // 1MB

/// A transition table keyed by state, then by the symbol under the head.
///
/// Each key maps to the ordered list of moves available from it. More than one entry
/// makes the machine nondeterministic; the order is the order in which children are
/// generated during exploration. Lookups take `&str`, so exploring never allocates a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    rules: HashMap<String, HashMap<char, Vec<Transition>>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the moves for `(state, read)`.
    pub fn insert(&mut self, (state, read): (String, char), moves: Vec<Transition>) {
        self.rules.entry(state).or_default().insert(read, moves);
    }

    /// Appends one move for `(state, read)` after the existing ones.
    pub fn push(&mut self, (state, read): (String, char), transition: Transition) {
        self.rules
            .entry(state)
            .or_default()
            .entry(read)
            .or_default()
            .push(transition);
    }

    /// Returns the moves for `(state, read)`, if any are defined.
    pub fn get(&self, state: &str, read: char) -> Option<&[Transition]> {
        self.rules
            .get(state)
            .and_then(|by_symbol| by_symbol.get(&read))
            .map(Vec::as_slice)
    }

    /// Iterates over every `(state, read, moves)` entry in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, char, &[Transition])> {
        self.rules.iter().flat_map(|(state, by_symbol)| {
            by_symbol
                .iter()
                .map(move |(read, moves)| (state.as_str(), *read, moves.as_slice()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.values().all(HashMap::is_empty)
    }
}

/// A parsed single-tape nondeterministic Turing machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Machine {
    /// The name of the machine, taken from the first line of its description.
    pub name: String,
    /// Every state declared by the description.
    pub states: Vec<String>,
    /// The declared input alphabet.
    pub input_alphabet: Vec<char>,
    /// The declared tape alphabet.
    pub tape_alphabet: Vec<char>,
    /// The state the machine starts in.
    pub start_state: String,
    /// Reaching this state accepts the input.
    pub accept_state: String,
    /// Reaching this state ends the branch without accepting.
    pub reject_state: String,
    /// The transition table.
    #[serde(with = "table_serde")]
    pub rules: TransitionTable,
}

impl Machine {
    /// Returns the moves available from `state` when `symbol` is under the head.
    pub fn transitions(&self, state: &str, symbol: char) -> &[Transition] {
        self.rules.get(state, symbol).unwrap_or(&[])
    }

    /// Returns true if no `(state, symbol)` pair has more than one move.
    pub fn is_deterministic(&self) -> bool {
        self.rules.iter().all(|(_, _, moves)| moves.len() <= 1)
    }

    /// Total number of transition records in the table.
    pub fn transition_count(&self) -> usize {
        self.rules.iter().map(|(_, _, moves)| moves.len()).sum()
    }
}

/// One move of the transition table: where to go, what to write, which way to shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The next state the machine transitions to.
    pub next_state: String,
    /// The symbol written over the cell under the head.
    pub write: char,
    /// The direction the head moves after writing.
    pub direction: Direction,
}

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

/// An instantaneous snapshot of the machine: the tape split around the head plus the
/// current state.
///
/// The first symbol of `right` is the one under the head. An empty `right` means the
/// head rests on a blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    pub left: Vec<char>,
    pub state: String,
    pub right: Vec<char>,
}

impl Configuration {
    /// Creates the start configuration for `input`: empty left segment, whole input on
    /// the right.
    pub fn initial(state: &str, input: &str) -> Self {
        Self {
            left: Vec::new(),
            state: state.to_string(),
            right: input.chars().collect(),
        }
    }

    /// Returns the symbol under the head, or the blank when the right segment is empty.
    pub fn head(&self) -> char {
        self.right.first().copied().unwrap_or(BLANK_SYMBOL)
    }

    /// Returns the left segment as a string.
    pub fn left_str(&self) -> String {
        self.left.iter().collect()
    }

    /// Returns the right segment as a string.
    pub fn right_str(&self) -> String {
        self.right.iter().collect()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left_str(), self.state, self.right_str())
    }
}

/// The outcome of exploring a machine's configuration tree. Exactly one variant holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExplorationResult {
    /// A configuration in the accept state was found at `depth`.
    Accepted {
        depth: usize,
        total_transitions: usize,
        /// Configurations from the start to the accepting one, inclusive.
        path: Vec<Configuration>,
    },
    /// Every branch halted without accepting; `depth` is the level where the frontier died.
    Rejected {
        depth: usize,
        total_transitions: usize,
    },
    /// The frontier was still live when the depth bound was reached.
    TimedOut {
        depth: usize,
        total_transitions: usize,
    },
    /// The configuration budget ran out while expanding level `depth`.
    Exhausted {
        depth: usize,
        total_transitions: usize,
    },
}

impl ExplorationResult {
    /// The depth reported by the outcome.
    pub fn depth(&self) -> usize {
        match self {
            Self::Accepted { depth, .. }
            | Self::Rejected { depth, .. }
            | Self::TimedOut { depth, .. }
            | Self::Exhausted { depth, .. } => *depth,
        }
    }

    /// The number of configurations generated during the search.
    pub fn total_transitions(&self) -> usize {
        match self {
            Self::Accepted {
                total_transitions, ..
            }
            | Self::Rejected {
                total_transitions, ..
            }
            | Self::TimedOut {
                total_transitions, ..
            }
            | Self::Exhausted {
                total_transitions, ..
            } => *total_transitions,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The accepting path, if the input was accepted.
    pub fn path(&self) -> Option<&[Configuration]> {
        match self {
            Self::Accepted { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Represents the errors that can occur while loading a machine description.
///
/// The explorer itself never fails; everything here is raised before a search starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// Indicates an error during the parsing of a machine description.
    #[error("Machine parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates that a parsed machine is not well formed.
    #[error("Machine validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading a machine description from disk.
    #[error("File error: {0}")]
    FileError(String),
}

/// The table is serialized as a list of flat `(state, read, moves)` records in a stable
/// order.
mod table_serde {
    use super::{Transition, TransitionTable};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Entry {
        state: String,
        read: char,
        moves: Vec<Transition>,
    }

    pub fn serialize<S: Serializer>(table: &TransitionTable, s: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<Entry> = table
            .iter()
            .map(|(state, read, moves)| Entry {
                state: state.to_string(),
                read,
                moves: moves.to_vec(),
            })
            .collect();
        entries.sort_by(|a, b| (&a.state, a.read).cmp(&(&b.state, b.read)));
        entries.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TransitionTable, D::Error> {
        let entries = Vec::<Entry>::deserialize(d)?;
        let mut table = TransitionTable::new();
        for e in entries {
            table.insert((e.state, e.read), e.moves);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let right_json = serde_json::to_string(&Direction::Right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let right: Direction = serde_json::from_str(&right_json).unwrap();
        assert_eq!(right, Direction::Right);
    }

    #[test]
    fn test_transition_table_keeps_push_order() {
        let mut rules = TransitionTable::new();
        assert!(rules.is_empty());

        for next in ["q1", "q2", "q3"] {
            rules.push(
                ("q0".to_string(), 'a'),
                Transition {
                    next_state: next.into(),
                    write: 'a',
                    direction: Direction::Right,
                },
            );
        }

        let moves = rules.get("q0", 'a').unwrap();
        let targets: Vec<_> = moves.iter().map(|t| t.next_state.as_str()).collect();
        assert_eq!(targets, vec!["q1", "q2", "q3"]);
        assert!(rules.get("q0", 'b').is_none());
        assert!(rules.get("q9", 'a').is_none());
        assert_eq!(rules.iter().count(), 1);
    }

    #[test]
    fn test_head_symbol_defaults_to_blank() {
        let config = Configuration::initial("q0", "");
        assert_eq!(config.head(), BLANK_SYMBOL);

        let config = Configuration::initial("q0", "01");
        assert_eq!(config.head(), '0');
    }

    #[test]
    fn test_configuration_display() {
        let config = Configuration {
            left: vec!['x', 'y'],
            state: "q1".into(),
            right: vec!['1', '_'],
        };

        assert_eq!(config.to_string(), "xy q1 1_");
    }

    #[test]
    fn test_result_accessors() {
        let result = ExplorationResult::TimedOut {
            depth: 7,
            total_transitions: 42,
        };

        assert_eq!(result.depth(), 7);
        assert_eq!(result.total_transitions(), 42);
        assert!(!result.is_accepted());
        assert!(result.path().is_none());
    }

    #[test]
    fn test_result_is_tagged_in_json() {
        let result = ExplorationResult::Rejected {
            depth: 3,
            total_transitions: 5,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"outcome":"rejected","depth":3,"total_transitions":5}"#
        );
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::ValidationError("bad state q9".to_string());

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("validation"));
        assert!(error_msg.contains("q9"));
    }
}
