//! palrip - Library for extracting indexed bitmaps from legacy image containers
//!
//! This library provides functionality to:
//! - Parse container headers, file tables and 15-bit palette tables
//! - Bind images to palettes, either by stored index or by index-range search
//! - Render images onto shared sequence canvases and write them as PNG
//! - Dump every record as hex for manual inspection

pub mod batch;
pub mod canvas;
pub mod cli;
pub mod color;
pub mod config;
pub mod container;
pub mod diagnostics;
pub mod error;
pub mod image_table;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod policy;
pub mod renderer;
pub mod resolve;
