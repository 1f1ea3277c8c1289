//! A catalogue of machine descriptions embedded in the library.

use crate::loader::DescriptionLoader;
use crate::types::{MachineDescription, MachineError};

// Name, sample input and description text of each embedded program.
const PROGRAM_TEXTS: [(&str, &str, &str); 4] = [
    (
        "binary-increment",
        "1011",
        include_str!("../programs/binary-increment.tm"),
    ),
    ("palindrome", "abba", include_str!("../programs/palindrome.tm")),
    (
        "unary-addition",
        "11+111",
        include_str!("../programs/unary-addition.tm"),
    ),
    ("forever", "1", include_str!("../programs/forever.tm")),
];

/// An embedded program together with an input word worth running it on.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInfo {
    pub name: &'static str,
    pub sample: &'static str,
    pub description: MachineDescription,
}

lazy_static::lazy_static! {
    /// Every embedded program, parsed once on first use.
    pub static ref PROGRAMS: Vec<ProgramInfo> = PROGRAM_TEXTS
        .iter()
        .filter_map(|&(name, sample, text)| {
            DescriptionLoader::load_from_string(text).ok().map(|description| ProgramInfo {
                name,
                sample,
                description,
            })
        })
        .collect();
}

pub struct ProgramCatalog;

impl ProgramCatalog {
    /// Get the number of available programs
    pub fn count() -> usize {
        PROGRAMS.len()
    }

    /// Get the names of all programs in catalogue order
    pub fn names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|p| p.name).collect()
    }

    /// Get a program by its index
    pub fn by_index(index: usize) -> Result<ProgramInfo, MachineError> {
        PROGRAMS.get(index).cloned().ok_or_else(|| {
            MachineError::ValidationError(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name
    pub fn by_name(name: &str) -> Result<ProgramInfo, MachineError> {
        PROGRAMS
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| MachineError::ValidationError(format!("Program '{}' not found", name)))
    }
}
