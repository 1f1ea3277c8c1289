//! This module provides the `DescriptionLoader` struct, responsible for loading machine
//! descriptions and input words from files and strings.

use crate::parser::parse;
use crate::types::{MachineDescription, MachineError};
use std::fs;
use std::path::{Path, PathBuf};

/// The file extension of machine description files.
pub const DESCRIPTION_EXTENSION: &str = "tm";

/// `DescriptionLoader` is a utility struct for loading machine descriptions.
pub struct DescriptionLoader;

impl DescriptionLoader {
    /// Loads a single machine description from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineDescription)` if the file is successfully read and parsed.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::ParseError)` if the file content is not a valid description.
    pub fn load(path: &Path) -> Result<MachineDescription, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Loads a single machine description from the provided string content.
    pub fn load_from_string(content: &str) -> Result<MachineDescription, MachineError> {
        parse(content)
    }

    /// Reads an input word from a file. Surrounding whitespace, including the trailing
    /// newline most editors add, is not part of the word.
    pub fn read_word(path: &Path) -> Result<String, MachineError> {
        fs::read_to_string(path)
            .map(|content| content.trim().to_string())
            .map_err(|e| {
                MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
            })
    }

    /// Loads every description file (`.tm` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each element of the result
    /// is either the path and description of a loaded file, or the error it failed with.
    pub fn load_all(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, MachineDescription), MachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let path = match entry {
                    Ok(entry) => entry.path(),
                    Err(e) => {
                        return Some(Err(MachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                if path.is_dir()
                    || path
                        .extension()
                        .is_none_or(|ext| ext != DESCRIPTION_EXTENSION)
                {
                    return None;
                }

                Some(Self::load(&path).map(|description| (path, description)))
            })
            .collect();

        // `read_dir` order is platform dependent.
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}
