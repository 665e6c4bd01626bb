//! Parallel batch execution.
//!
//! Containers are independent, so each one is extracted on its own worker of
//! a dedicated `rayon` pool. Results come back in input order regardless of
//! completion order.
//!
//! # Example
//!
//! ```ignore
//! use palrip::batch::BatchRunner;
//! use palrip::pipeline::ExtractOptions;
//!
//! let result = BatchRunner::new("out".into(), ExtractOptions::default())
//!     .with_jobs(4)
//!     .run(&files)?;
//! println!("{}", result.summary());
//! ```

use crate::batch::{discover_inputs, BatchResult, DiscoveryOptions, FileResult};
use crate::pipeline::{extract_file, ExtractOptions};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Error that prevents a batch from running at all.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Discovery(#[from] crate::batch::DiscoveryError),
    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Default number of parallel jobs (uses available parallelism).
pub fn default_jobs() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Batch extractor over many container files.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    output_root: PathBuf,
    options: ExtractOptions,
    jobs: usize,
}

impl BatchRunner {
    pub fn new(output_root: PathBuf, options: ExtractOptions) -> Self {
        Self { output_root, options, jobs: default_jobs() }
    }

    /// Set the number of parallel jobs; `0` means available parallelism.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = if jobs == 0 { default_jobs() } else { jobs };
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Expand `inputs` (files or directories) and extract every container found.
    pub fn run_inputs(&self, inputs: &[PathBuf], discovery: &DiscoveryOptions) -> Result<BatchResult, BatchError> {
        let files = discover_inputs(inputs, discovery)?;
        info!(files = files.len(), policy = %self.options.policy, jobs = self.jobs, "starting extraction");
        self.run(&files)
    }

    /// Extract every file. A failing file never stops the others.
    pub fn run(&self, files: &[PathBuf]) -> Result<BatchResult, BatchError> {
        let start = Instant::now();

        let results: Vec<FileResult> = if self.jobs == 1 || files.len() <= 1 {
            files.iter().map(|file| self.extract_one(file)).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(self.jobs.min(files.len())).build()?;
            pool.install(|| files.par_iter().map(|file| self.extract_one(file)).collect())
        };

        let mut result = BatchResult::new();
        for file in results {
            result.add_result(file);
        }
        Ok(result.with_duration(start.elapsed()))
    }

    fn extract_one(&self, input: &Path) -> FileResult {
        let start = Instant::now();
        match extract_file(input, &self.output_root, &self.options) {
            Ok(report) => {
                let warnings = report.issues.iter().map(|issue| issue.to_string()).collect();
                FileResult::success(input.to_path_buf(), report.output_dir, report.written, start.elapsed())
                    .with_warnings(warnings)
            }
            Err(err) if err.is_empty_input() => FileResult::skipped(input.to_path_buf()),
            Err(err) => {
                warn!(file = %input.display(), %err, "skipping container");
                FileResult::failed(input.to_path_buf(), err.to_string(), start.elapsed())
            }
        }
    }
}
