//! Extract command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::batch::{BatchError, BatchRunner, DiscoveryOptions};
use crate::config::{merge_cli_overrides, CliOverrides};
use crate::pipeline::ExtractOptions;
use crate::policy::DecodePolicy;

use super::{resolve_config, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Run the extract command
pub fn run_extract(
    inputs: &[PathBuf],
    out: Option<PathBuf>,
    policy: Option<DecodePolicy>,
    scale: Option<u8>,
    jobs: Option<usize>,
    config_path: Option<&Path>,
) -> ExitCode {
    let config = match resolve_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let overrides = CliOverrides { out, policy, scale, jobs };
    let config = match merge_cli_overrides(config, &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let discovery =
        DiscoveryOptions { extensions: config.input.extensions.clone(), recursive: config.input.recursive };
    let options = ExtractOptions { policy: config.decode.policy, scale: config.render.scale };
    let runner = BatchRunner::new(config.output.dir.clone(), options).with_jobs(config.render.jobs);

    match runner.run_inputs(inputs, &discovery) {
        Ok(result) if result.files.is_empty() => {
            println!("No container files found");
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(result) => {
            println!("{}", result.summary());
            if result.is_success() {
                ExitCode::from(EXIT_SUCCESS)
            } else {
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e @ BatchError::Discovery(_)) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
