//! Input discovery.
//!
//! Expands the inputs given on the command line into container files:
//! files are taken as they are, directories are searched with glob patterns
//! built from the configured extensions.

use glob::{glob_with, MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Error during input discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Invalid glob pattern
    #[error("invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, glob::PatternError),
}

/// How directories are searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Extensions without the leading dot, matched case-insensitively
    pub extensions: Vec<String>,
    pub recursive: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self { extensions: vec!["img".to_string()], recursive: true }
    }
}

/// Expand `inputs` into a sorted, de-duplicated list per input.
///
/// Explicit files are kept whatever their extension. A path that does not
/// exist is kept too, so the batch records it as a failed file instead of
/// abandoning the other inputs. Order follows `inputs`; files found under one
/// directory are sorted.
pub fn discover_inputs(inputs: &[PathBuf], options: &DiscoveryOptions) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let found = if input.is_dir() {
            find_in_dir(input, options)?
        } else {
            if !input.exists() {
                warn!(input = %input.display(), "input not found");
            }
            vec![input.clone()]
        };
        for file in found {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    Ok(files)
}

/// Find files with one of the configured extensions under `dir`.
pub fn find_in_dir(dir: &Path, options: &DiscoveryOptions) -> Result<Vec<PathBuf>, DiscoveryError> {
    let match_options = MatchOptions { case_sensitive: false, ..MatchOptions::new() };
    let base = Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();

    for ext in &options.extensions {
        let pattern = if options.recursive {
            format!("{}/**/*.{}", base, ext)
        } else {
            format!("{}/*.{}", base, ext)
        };
        let paths = glob_with(&pattern, match_options).map_err(|e| DiscoveryError::InvalidPattern(pattern.clone(), e))?;
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "error reading path"),
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
