//! Terminal path selection
//!
//! Stands in for a file dialog: uses the path given up front, or asks on
//! stdin.

use binview::PathSelector;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub struct PromptSelector {
    preset: Option<PathBuf>,
}

impl PromptSelector {
    pub fn new(preset: Option<PathBuf>) -> Self {
        Self { preset }
    }
}

impl PathSelector for PromptSelector {
    fn prompt_for_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.preset {
            return Some(path.clone());
        }

        eprint!("File to open (empty to cancel): ");
        let _ = io::stderr().flush();
        read_path(io::stdin().lock())
    }
}

/// Read one line as a path; a blank line or EOF cancels
fn read_path<R: BufRead>(mut reader: R) -> Option<PathBuf> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(PathBuf::from(trimmed))
            }
        }
    }
}
