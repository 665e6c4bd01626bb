//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod extract;
mod info;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::{find_config, load_config, ConfigError, PalripConfig};
use crate::policy::DecodePolicy;

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// palrip - extract indexed bitmaps and 15-bit palettes from image containers
#[derive(Parser)]
#[command(name = "palrip")]
#[command(about = "Extract indexed bitmaps and their palettes from legacy image containers to PNG")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log per-palette and per-image decode details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode containers and write PNG images plus palette/image listings
    Extract {
        /// Container files or directories to search
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output root; each container gets <out>/<file-name>/
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Container variant
        #[arg(long, value_enum)]
        policy: Option<DecodePolicy>,

        /// Scale output by integer factor (1-16)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: Option<u8>,

        /// Parallel jobs (0 = available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Config file (default: palrip.toml found by walking up from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the header, palettes and images of one container without writing files
    Info {
        /// Container file
        file: PathBuf,

        /// Container variant
        #[arg(long, value_enum)]
        policy: Option<DecodePolicy>,
    },
}

/// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();
}

/// Load the explicit config file, or the discovered one, or the defaults.
pub(crate) fn resolve_config(path: Option<&Path>) -> Result<PalripConfig, ConfigError> {
    let path = path.map(Path::to_path_buf).or_else(find_config);
    match &path {
        Some(path) => tracing::debug!(config = %path.display(), "using config"),
        None => tracing::debug!("no palrip.toml found, using defaults"),
    }
    load_config(path.as_deref())
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Extract { inputs, out, policy, scale, jobs, config } => {
            extract::run_extract(&inputs, out, policy, scale, jobs, config.as_deref())
        }
        Commands::Info { file, policy } => info::run_info(&file, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from([
            "palrip", "extract", "a.img", "data", "-o", "dist", "--policy", "heuristic", "--scale", "2", "-j", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract { inputs, out, policy, scale, jobs, config } => {
                assert_eq!(inputs, vec![PathBuf::from("a.img"), PathBuf::from("data")]);
                assert_eq!(out, Some(PathBuf::from("dist")));
                assert_eq!(policy, Some(DecodePolicy::Heuristic));
                assert_eq!(scale, Some(2));
                assert_eq!(jobs, Some(3));
                assert!(config.is_none());
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_scale_and_missing_inputs() {
        assert!(Cli::try_parse_from(["palrip", "extract", "a.img", "--scale", "0"]).is_err());
        assert!(Cli::try_parse_from(["palrip", "extract", "a.img", "--scale", "17"]).is_err());
        assert!(Cli::try_parse_from(["palrip", "extract"]).is_err());
        assert!(Cli::try_parse_from(["palrip", "extract", "a.img", "--policy", "guess"]).is_err());
    }

    #[test]
    fn test_parse_info_verbose_global() {
        let cli = Cli::try_parse_from(["palrip", "info", "a.img", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Info { policy: None, .. }));
    }
}
