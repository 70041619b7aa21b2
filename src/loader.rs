//! This module provides the `MachineLoader` struct, responsible for loading machine
//! descriptions from files and strings.

use crate::parser::parse;
use crate::types::{Machine, TuringMachineError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `MachineLoader` is a utility struct for loading machine descriptions.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a single machine from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if the file is successfully read, parsed and validated.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ParseError)` if the file content is not a valid description.
    pub fn load_machine(path: &Path) -> Result<Machine, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let machine = parse(&content)?;
        debug!(
            path = %path.display(),
            name = machine.name.as_str(),
            transitions = machine.transition_count(),
            "loaded machine"
        );

        Ok(machine)
    }

    /// Loads a single machine from the provided string content.
    pub fn load_machine_from_string(content: &str) -> Result<Machine, TuringMachineError> {
        parse(content)
    }

    /// Loads every machine description with the given extension from a directory.
    ///
    /// Directories and files with other extensions are skipped. Each element of the result
    /// is either the path and machine, or the error raised while loading that file.
    pub fn load_machines(
        directory: &Path,
        extension: &str,
    ) -> Vec<Result<(PathBuf, Machine), TuringMachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != extension) {
                    return None;
                }

                Some(Self::load_machine(&path).map(|machine| (path, machine)))
            })
            .collect();

        // read_dir order is platform dependent
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}
