//! This crate provides the core logic for a single-tape deterministic Turing Machine
//! simulator. It includes modules for the unbounded tape, the machine and its lazy
//! configuration sequence, parsing machine descriptions, and a catalogue of embedded
//! programs.

pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `DescriptionLoader` struct from the loader module.
pub use loader::DescriptionLoader;
/// Re-exports the machine, its configurations and the run iterator.
pub use machine::{Configuration, Machine, Run};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `ProgramInfo`, `ProgramCatalog`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramCatalog, ProgramInfo, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the description types and constants from the types module.
pub use types::{
    present, Direction, MachineDescription, MachineError, Transition, BLANK, DEFAULT_STEP_LIMIT,
    MAX_DESCRIPTION_SIZE,
};
