//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//! It defines the grammar for `.tm` files and functions to parse the input into a
//! `MachineDescription`.

use crate::types::{Direction, MachineDescription, MachineError, Transition, MAX_DESCRIPTION_SIZE};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// Parses the given input string into a `MachineDescription`.
///
/// The description consists of the `start:`, `accept:`, `reject:` and `blank:` headers,
/// each given exactly once, and any number of transition lines of the form
/// `state symbol -> next_state write move` where `move` is one of `<`, `>` or `^`.
///
/// # Returns
///
/// * `Ok(MachineDescription)` if the input is successfully parsed.
/// * `Err(MachineError::ParseError)` if there are any syntax errors or repeated headers.
/// * `Err(MachineError::ValidationError)` if a header is missing or the input is too large.
pub fn parse(input: &str) -> Result<MachineDescription, MachineError> {
    if input.len() > MAX_DESCRIPTION_SIZE {
        return Err(MachineError::ValidationError(format!(
            "Description is {} bytes, the limit is {} bytes",
            input.len(),
            MAX_DESCRIPTION_SIZE
        )));
    }

    let root = DescriptionParser::parse(Rule::description, input.trim())
        .map_err(|e| MachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| MachineError::ValidationError("Empty description".to_string()))?;

    parse_description(root)
}

/// Collects the headers and transitions of a `Pair<Rule::description>`.
fn parse_description(pair: Pair<Rule>) -> Result<MachineDescription, MachineError> {
    let mut start: Option<String> = None;
    let mut accept: Option<String> = None;
    let mut reject: Option<String> = None;
    let mut blank: Option<char> = None;
    let mut transitions = Vec::new();
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::start => start = Some(parse_inner_string(p, span)?),
            Rule::accept => accept = Some(parse_inner_string(p, span)?),
            Rule::reject => reject = Some(parse_inner_string(p, span)?),
            Rule::blank => blank = Some(parse_symbol(&parse_inner_string(p, span)?)),
            Rule::transition => transitions.push(parse_transition(p)?),
            _ => {} // EOI
        }
    }

    Ok(MachineDescription {
        start: check_required_rule(start, "start")?,
        accept: check_required_rule(accept, "accept")?,
        reject: check_required_rule(reject, "reject")?,
        blank: check_required_rule(blank, "blank")?,
        transitions,
    })
}

/// Parses a single transition line from a `Pair<Rule::transition>`.
fn parse_transition(pair: Pair<Rule>) -> Result<Transition, MachineError> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();

    let state = parse_string(&mut pairs, span)?;
    let symbol = parse_symbol(&parse_string(&mut pairs, span)?);
    let next_state = parse_string(&mut pairs, span)?;
    let write = parse_symbol(&parse_string(&mut pairs, span)?);
    let direction = match pairs.next() {
        Some(p) => parse_direction(p)?,
        None => return Err(parse_error("Missing head movement", span)),
    };

    Ok(Transition {
        state,
        symbol,
        next_state,
        write,
        direction,
    })
}

/// Parses a single direction from a `Pair<Rule::direction>`.
///
/// Supports '<' for Left, '>' for Right and '^' for Stay.
fn parse_direction(pair: Pair<Rule>) -> Result<Direction, MachineError> {
    let span = pair.as_span();
    match pair.as_str() {
        "<" => Ok(Direction::Left),
        ">" => Ok(Direction::Right),
        "^" => Ok(Direction::Stay),
        other => Err(parse_error(&format!("Unsupported direction: {other}"), span)),
    }
}

/// Creates a `MachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> MachineError {
    MachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// The grammar only admits single-character symbols.
fn parse_symbol(input: &str) -> char {
    input.chars().next().unwrap_or_default()
}

/// Extracts the inner string content of a header `Pair`.
fn parse_inner_string(pair: Pair<Rule>, span: Span) -> Result<String, MachineError> {
    parse_string(&mut pair.into_inner(), span)
}

/// Extracts the string content from the current `Pair` in a `Pairs` iterator.
fn parse_string(pairs: &mut Pairs<Rule>, span: Span) -> Result<String, MachineError> {
    pairs
        .next()
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| parse_error("Unexpected end of line", span))
}

/// Checks if a header has already been declared.
fn check_unique_rule(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), MachineError> {
    if !matches!(rule, Rule::start | Rule::accept | Rule::reject | Rule::blank) {
        return Ok(());
    }

    if !seen.insert(rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks if a required header is present, returning an `Err` if it's missing.
fn check_required_rule<T>(value: Option<T>, name: &str) -> Result<T, MachineError> {
    value.ok_or_else(|| MachineError::ValidationError(format!("Missing '{name}' declaration")))
}
