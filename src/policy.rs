//! Container variants
//!
//! Two container sub-formats share the same header and file table but differ
//! in how palettes are counted, how an image finds its palette, how canvases
//! are shared and in which order the 15-bit colour channels are packed.
//!
//! | Policy | Palette count | Palette binding | Canvas | Colour order | Background |
//! |--------|---------------|-----------------|--------|--------------|------------|
//! | `direct` | header field − 3 | selector − 3 | per sequence | RGB555 | first valid pixel |
//! | `heuristic` | fills table to EOF | index-range scan | per container | BGR555 | transparent |

use crate::color::ColorOrder;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which container variant to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Palette count and per-image palette index stored in the container
    #[default]
    Direct,
    /// No stored association, palettes recovered by scanning pixel indices
    Heuristic,
}

impl DecodePolicy {
    /// Channel packing used by this variant's palettes.
    pub fn color_order(&self) -> ColorOrder {
        match self {
            DecodePolicy::Direct => ColorOrder::Rgb555,
            DecodePolicy::Heuristic => ColorOrder::Bgr555,
        }
    }

    /// Whether the canvas is flood-filled from the first valid pixel.
    pub fn fills_background(&self) -> bool {
        matches!(self, DecodePolicy::Direct)
    }
}

impl std::fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodePolicy::Direct => write!(f, "direct"),
            DecodePolicy::Heuristic => write!(f, "heuristic"),
        }
    }
}
