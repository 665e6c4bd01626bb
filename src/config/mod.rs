//! Configuration for palrip
//!
//! Provides types and loading for `palrip.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
