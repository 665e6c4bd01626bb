//! palrip - Command-line tool for extracting images and palettes from legacy containers

use std::process::ExitCode;

use palrip::cli;

fn main() -> ExitCode {
    cli::run()
}
