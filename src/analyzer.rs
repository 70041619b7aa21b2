//! This module provides static checks on a parsed `Machine`, run before any exploration.
//! They catch references to undeclared states and symbols, which the explorer would
//! otherwise silently treat as dead ends.

use crate::types::{Machine, TuringMachineError, BLANK_SYMBOL};
use std::collections::HashSet;
use tracing::warn;

/// Represents the problems that can be found while analyzing a machine.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// One of the start, accept or reject states is not declared.
    UndeclaredSpecialState(String),
    /// Transitions mention states that are not declared.
    UndeclaredStates(Vec<String>),
    /// Transitions read or write symbols outside the tape alphabet.
    UndeclaredSymbols(Vec<char>),
    /// The input alphabet contains symbols outside the tape alphabet.
    InputNotInTapeAlphabet(Vec<char>),
    /// The accept and reject states are the same state.
    AcceptIsReject(String),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::UndeclaredSpecialState(state) => {
                TuringMachineError::ValidationError(format!("State '{}' is not declared", state))
            }
            AnalysisError::UndeclaredStates(states) => TuringMachineError::ValidationError(
                format!("Transitions reference undeclared states: {:?}", states),
            ),
            AnalysisError::UndeclaredSymbols(symbols) => TuringMachineError::ValidationError(
                format!("Transitions use symbols outside the tape alphabet: {:?}", symbols),
            ),
            AnalysisError::InputNotInTapeAlphabet(symbols) => {
                TuringMachineError::ValidationError(format!(
                    "Input alphabet symbols missing from the tape alphabet: {:?}",
                    symbols
                ))
            }
            AnalysisError::AcceptIsReject(state) => TuringMachineError::ValidationError(
                format!("Accept and reject states are both '{}'", state),
            ),
        }
    }
}

/// Analyzes a `Machine` for structural errors and returns the first one found.
///
/// Transitions leaving the accept or reject state are allowed, since exploration never
/// expands those states, but they are logged as warnings.
pub fn analyze(machine: &Machine) -> Result<(), TuringMachineError> {
    let errors = [
        check_special_states,
        check_accept_differs_from_reject,
        check_transition_states,
        check_transition_symbols,
        check_input_alphabet,
    ]
    .iter()
    .filter_map(|f| f(machine).err())
    .collect::<Vec<_>>();

    if let Some(first_error) = errors.into_iter().next() {
        return Err(first_error.into());
    }

    warn_unreachable_transitions(machine);

    Ok(())
}

fn check_special_states(machine: &Machine) -> Result<(), AnalysisError> {
    let declared: HashSet<&str> = machine.states.iter().map(String::as_str).collect();

    [
        &machine.start_state,
        &machine.accept_state,
        &machine.reject_state,
    ]
    .into_iter()
    .find(|state| !declared.contains(state.as_str()))
    .map_or(Ok(()), |state| {
        Err(AnalysisError::UndeclaredSpecialState(state.clone()))
    })
}

fn check_accept_differs_from_reject(machine: &Machine) -> Result<(), AnalysisError> {
    if machine.accept_state == machine.reject_state {
        return Err(AnalysisError::AcceptIsReject(machine.accept_state.clone()));
    }

    Ok(())
}

/// Checks that every source and target state of the table is declared.
fn check_transition_states(machine: &Machine) -> Result<(), AnalysisError> {
    let declared: HashSet<&str> = machine.states.iter().map(String::as_str).collect();

    let mut undeclared: Vec<String> = machine
        .rules
        .iter()
        .flat_map(|(state, _, moves)| {
            std::iter::once(state).chain(moves.iter().map(|t| t.next_state.as_str()))
        })
        .filter(|state| !declared.contains(state))
        .map(str::to_string)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    if !undeclared.is_empty() {
        undeclared.sort(); // Sort for deterministic output
        return Err(AnalysisError::UndeclaredStates(undeclared));
    }

    Ok(())
}

/// Checks that every read and written symbol is blank or in the tape alphabet.
fn check_transition_symbols(machine: &Machine) -> Result<(), AnalysisError> {
    let mut undeclared: Vec<char> = machine
        .rules
        .iter()
        .flat_map(|(_, read, moves)| std::iter::once(read).chain(moves.iter().map(|t| t.write)))
        .filter(|symbol| !is_tape_symbol(machine, *symbol))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    if !undeclared.is_empty() {
        undeclared.sort();
        return Err(AnalysisError::UndeclaredSymbols(undeclared));
    }

    Ok(())
}

fn check_input_alphabet(machine: &Machine) -> Result<(), AnalysisError> {
    let missing: Vec<char> = machine
        .input_alphabet
        .iter()
        .copied()
        .filter(|symbol| !is_tape_symbol(machine, *symbol))
        .collect();

    if !missing.is_empty() {
        return Err(AnalysisError::InputNotInTapeAlphabet(missing));
    }

    Ok(())
}

fn is_tape_symbol(machine: &Machine, symbol: char) -> bool {
    symbol == BLANK_SYMBOL || machine.tape_alphabet.contains(&symbol)
}

fn warn_unreachable_transitions(machine: &Machine) {
    for (state, read, moves) in machine.rules.iter() {
        if state == machine.accept_state || state == machine.reject_state {
            warn!(
                state,
                read = %read,
                count = moves.len(),
                "transitions out of a halting state are never taken"
            );
        }
    }
}
