//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//! The grammar lives in `grammar.pest`; this module turns its parse tree into a `Machine`.

use crate::{
    analyzer::analyze,
    types::{
        Direction, Machine, Transition, TransitionTable, TuringMachineError, MAX_PROGRAM_SIZE,
    },
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the machine description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// Parses the given input string into a `Machine`.
///
/// This is the main entry point for reading machine descriptions. The parsed machine is
/// validated by [`analyze`] before being returned, so the explorer only ever sees
/// well-formed tables.
///
/// # Returns
///
/// * `Ok(Machine)` if the input is successfully parsed and validated.
/// * `Err(TuringMachineError::ParseError)` if there are any syntax errors.
/// * `Err(TuringMachineError::ValidationError)` if the machine fails validation.
pub fn parse(input: &str) -> Result<Machine, TuringMachineError> {
    if input.len() > MAX_PROGRAM_SIZE {
        return Err(TuringMachineError::ValidationError(format!(
            "Machine description is {} bytes, the limit is {}",
            input.len(),
            MAX_PROGRAM_SIZE
        )));
    }

    let root = MachineParser::parse(Rule::program, input.trim())
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("Empty machine description".into()))?;

    let machine = parse_machine(root)?;

    analyze(&machine)?;

    Ok(machine)
}

/// Walks the top-level `program` pair. The grammar fixes the order of the header lines,
/// so every field is guaranteed to be present once parsing succeeded.
fn parse_machine(pair: Pair<Rule>) -> Result<Machine, TuringMachineError> {
    let mut name = String::new();
    let mut states = Vec::new();
    let mut input_alphabet = Vec::new();
    let mut tape_alphabet = Vec::new();
    let mut start_state = String::new();
    let mut accept_state = String::new();
    let mut reject_state = String::new();
    let mut rules = TransitionTable::new();

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::name => name = p.as_str().trim().to_string(),
            Rule::states => states = p.into_inner().map(|s| s.as_str().to_string()).collect(),
            Rule::input_alphabet => input_alphabet = parse_symbols(p),
            Rule::tape_alphabet => tape_alphabet = parse_symbols(p),
            Rule::start => start_state = parse_inner_string(p),
            Rule::accept => accept_state = parse_inner_string(p),
            Rule::reject => reject_state = parse_inner_string(p),
            Rule::transition => {
                let (key, transition) = parse_transition(p)?;
                // Repeated keys are how nondeterminism is written down; keep file order.
                rules.push(key, transition);
            }
            _ => {} // SOI, EOI
        }
    }

    Ok(Machine {
        name,
        states,
        input_alphabet,
        tape_alphabet,
        start_state,
        accept_state,
        reject_state,
        rules,
    })
}

/// Parses a `current,read,next,write,direction` record.
fn parse_transition(
    pair: Pair<Rule>,
) -> Result<((String, char), Transition), TuringMachineError> {
    let mut pairs = pair.into_inner();

    let state = parse_string(&mut pairs)?;
    let read = parse_symbol_from_pairs(&mut pairs)?;
    let next_state = parse_string(&mut pairs)?;
    let write = parse_symbol_from_pairs(&mut pairs)?;
    let direction = match pairs.next() {
        Some(p) => parse_direction(p)?,
        None => return Err(missing_field("direction")),
    };

    Ok((
        (state, read),
        Transition {
            next_state,
            write,
            direction,
        },
    ))
}

/// Parses a single direction from a `Pair<Rule::direction>`.
fn parse_direction(pair: Pair<Rule>) -> Result<Direction, TuringMachineError> {
    let span = pair.as_span();
    match pair.as_str() {
        "L" => Ok(Direction::Left),
        "R" => Ok(Direction::Right),
        other => Err(parse_error(&format!("Unsupported direction: {other}"), span)),
    }
}

/// Parses a comma-separated symbol list.
fn parse_symbols(pair: Pair<Rule>) -> Vec<char> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::symbol)
        .filter_map(|p| p.as_str().chars().next())
        .collect()
}

/// Parses a single character symbol from a `Pairs` iterator.
fn parse_symbol_from_pairs(pairs: &mut Pairs<Rule>) -> Result<char, TuringMachineError> {
    parse_string(pairs)?
        .chars()
        .next()
        .ok_or_else(|| missing_field("symbol"))
}

/// Extracts the inner string content from a `Pair`.
fn parse_inner_string(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

/// Extracts the string content from the current `Pair` in a `Pairs` iterator.
fn parse_string(pairs: &mut Pairs<Rule>) -> Result<String, TuringMachineError> {
    pairs
        .next()
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| missing_field("state"))
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

fn missing_field(field: &str) -> TuringMachineError {
    TuringMachineError::ValidationError(format!("Transition is missing its {field}"))
}
