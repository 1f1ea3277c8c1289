//! This module defines the core data structures and types used throughout the simulator,
//! including transitions, machine descriptions, and the error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::machine::Machine;
use crate::Rule;

/// The internal blank marker stored in untouched tape cells.
///
/// It is never a legal symbol of a machine description; the presentation blank of a
/// description is mapped onto it when a `Machine` is built.
pub const BLANK: char = '\u{0}';
/// The symbol used to show `BLANK` when no presentation blank is supplied.
pub const DISPLAY_BLANK_SYMBOL: char = '_';
/// The maximum allowed size for a machine description in bytes.
pub const MAX_DESCRIPTION_SIZE: usize = 65536; // 64KB
/// The default step budget a driver imposes on a run.
pub const DEFAULT_STEP_LIMIT: usize = 10000;

/// Maps the internal [`BLANK`] to `blank` for display, leaving other symbols alone.
pub fn present(symbol: char, blank: char) -> char {
    if symbol == BLANK {
        blank
    } else {
        symbol
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one cell to the left.
    Left,
    /// Move the head one cell to the right.
    Right,
    /// Keep the head on the same cell.
    Stay,
}

impl Direction {
    /// Returns the description-file notation of this direction.
    pub fn symbol(self) -> char {
        match self {
            Direction::Left => '<',
            Direction::Right => '>',
            Direction::Stay => '^',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single entry of the transition function.
///
/// When the machine is in `state` and reads `symbol`, it writes `write`, moves the head
/// in `direction` and continues in `next_state`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// The state this transition applies to.
    pub state: String,
    /// The symbol under the head this transition applies to.
    pub symbol: char,
    /// The state the machine continues in.
    pub next_state: String,
    /// The symbol written to the current cell.
    pub write: char,
    /// The head movement performed after the write.
    pub direction: Direction,
}

impl Transition {
    pub fn new(
        state: impl Into<String>,
        symbol: char,
        next_state: impl Into<String>,
        write: char,
        direction: Direction,
    ) -> Self {
        Self {
            state: state.into(),
            symbol,
            next_state: next_state.into(),
            write,
            direction,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {} {}",
            self.state, self.symbol, self.next_state, self.write, self.direction
        )
    }
}

/// Everything needed to build a [`Machine`].
///
/// `blank` is a presentation symbol: cells holding it in `transitions` or in an input word
/// refer to the machine's internal blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDescription {
    /// The initial state of every run.
    pub start: String,
    /// The accepting halt state.
    pub accept: String,
    /// The rejecting halt state.
    pub reject: String,
    /// The presentation blank symbol.
    pub blank: char,
    /// The transition function, one entry per `(state, symbol)` pair.
    pub transitions: Vec<Transition>,
}

impl MachineDescription {
    /// Builds a [`Machine`] from this description.
    pub fn to_machine(&self) -> Result<Machine, MachineError> {
        Machine::new(self)
    }

    /// Serializes the description as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, MachineError> {
        serde_json::to_string_pretty(self).map_err(|e| MachineError::ValidationError(e.to_string()))
    }

    /// Deserializes a description from JSON.
    pub fn from_json(json: &str) -> Result<Self, MachineError> {
        serde_json::from_str(json).map_err(|e| MachineError::ValidationError(e.to_string()))
    }

    /// Maps the presentation blank to the internal [`BLANK`].
    pub fn to_internal(&self, symbol: char) -> char {
        if symbol == self.blank {
            BLANK
        } else {
            symbol
        }
    }

    /// Maps the internal [`BLANK`] back to the presentation blank.
    pub fn to_presentation(&self, symbol: char) -> char {
        present(symbol, self.blank)
    }
}

/// Represents the errors that can occur while loading or building a machine.
///
/// Running a machine never fails: a missing transition is a rejection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// Two transitions share the same `(state, symbol)` key.
    #[error("Duplicate transition for state {0} and symbol {1:?}")]
    DuplicateTransition(String, char),
    /// Indicates an error during the parsing of a machine description.
    #[error("Description parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a structurally invalid description.
    #[error("Description validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading description or input files.
    #[error("File error: {0}")]
    FileError(String),
}
