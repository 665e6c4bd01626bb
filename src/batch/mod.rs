//! Batch extraction over many container files
//!
//! - **Discovery**: expand files and directories into container paths
//! - **Execution**: extract each container on a worker pool
//! - **Results**: per-file status and a printable summary

pub mod discovery;
pub mod result;
pub mod runner;

pub use discovery::*;
pub use result::*;
pub use runner::*;
