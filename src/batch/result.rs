//! Batch result types.
//!
//! Contains types for representing the outcome of extracting each container.

use std::path::PathBuf;
use std::time::Duration;

/// Status of a single container file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Container extracted
    Success,
    /// Nothing to do (empty file)
    Skipped,
    /// Container rejected or artifacts could not be written
    Failed(String),
}

impl FileStatus {
    /// Check if the status indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, FileStatus::Success | FileStatus::Skipped)
    }

    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, FileStatus::Failed(_))
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Success => write!(f, "success"),
            FileStatus::Skipped => write!(f, "skipped"),
            FileStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of extracting a single container.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Input file
    pub input: PathBuf,
    pub status: FileStatus,
    /// Directory the artifacts went to, if any were written
    pub output_dir: Option<PathBuf>,
    /// Number of PNG files written
    pub written: usize,
    pub duration: Duration,
    /// Skipped images
    pub warnings: Vec<String>,
}

impl FileResult {
    /// Create a successful result.
    pub fn success(input: PathBuf, output_dir: PathBuf, written: usize, duration: Duration) -> Self {
        Self {
            input,
            status: FileStatus::Success,
            output_dir: Some(output_dir),
            written,
            duration,
            warnings: vec![],
        }
    }

    /// Create a skipped result.
    pub fn skipped(input: PathBuf) -> Self {
        Self {
            input,
            status: FileStatus::Skipped,
            output_dir: None,
            written: 0,
            duration: Duration::ZERO,
            warnings: vec![],
        }
    }

    /// Create a failed result.
    pub fn failed(input: PathBuf, error: String, duration: Duration) -> Self {
        Self {
            input,
            status: FileStatus::Failed(error),
            output_dir: None,
            written: 0,
            duration,
            warnings: vec![],
        }
    }

    /// Add warnings to the result.
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete batch run.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Results for each input, in input order
    pub files: Vec<FileResult>,
    pub total_duration: Duration,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: FileResult) {
        self.files.push(result);
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    pub fn success_count(&self) -> usize {
        self.files.iter().filter(|r| matches!(r.status, FileStatus::Success)).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.files.iter().filter(|r| matches!(r.status, FileStatus::Skipped)).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|r| r.status.is_failure()).count()
    }

    /// Check if the batch succeeded (no failed files).
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Total PNG files written across all containers.
    pub fn images_written(&self) -> usize {
        self.files.iter().map(|r| r.written).sum()
    }

    pub fn all_warnings(&self) -> Vec<&String> {
        self.files.iter().flat_map(|r| r.warnings.iter()).collect()
    }

    pub fn failures(&self) -> Vec<&FileResult> {
        self.files.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Format a summary of the batch result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let success = self.success_count();
        let skipped = self.skipped_count();
        let failed = self.failed_count();
        let total = self.files.len();

        if failed > 0 {
            lines.push(format!(
                "Extraction failed: {} succeeded, {} skipped, {} failed ({} total)",
                success, skipped, failed, total
            ));
            for file in self.failures() {
                lines.push(format!("  - {}: {}", file.input.display(), file.status));
            }
        } else {
            lines.push(format!(
                "Extracted {} images from {} containers, {} skipped ({} total) in {:?}",
                self.images_written(),
                success,
                skipped,
                total,
                self.total_duration
            ));
        }

        let warnings = self.all_warnings();
        if !warnings.is_empty() {
            lines.push(format!("Skipped images ({}):", warnings.len()));
            for warning in warnings.iter().take(5) {
                lines.push(format!("  - {}", warning));
            }
            if warnings.len() > 5 {
                lines.push(format!("  ... and {} more", warnings.len() - 5));
            }
        }

        lines.join("\n")
    }
}
