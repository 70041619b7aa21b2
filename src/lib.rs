//! This crate traces nondeterministic single-tape Turing machines.
//! It includes modules for parsing machine descriptions, checking them, exploring their
//! configuration trees breadth-first, and rendering the outcome.

pub mod analyzer;
pub mod explorer;
pub mod loader;
pub mod parser;
pub mod report;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the explorer and its free-function form.
pub use explorer::{explore, reconstruct, Explorer};
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the machine and result types from the types module.
pub use types::{
    Configuration, Direction, ExplorationResult, Machine, Transition, TransitionTable,
    TuringMachineError, BLANK_SYMBOL, DEFAULT_MAX_CONFIGURATIONS, DEFAULT_MAX_DEPTH,
};
