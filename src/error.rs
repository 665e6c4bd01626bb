//! Decode error taxonomy
//!
//! Every error is scoped to the smallest unit it affects: a whole container,
//! a palette record, or a single image. Callers log and continue; nothing here
//! aborts a batch.

use thiserror::Error;

/// Error raised while decoding a container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Zero-length input, nothing to decode
    #[error("container is empty")]
    Empty,
    /// Header or table offsets point outside the buffer
    #[error("format error: {what} at {offset:#x} (+{len}) exceeds container length {available}")]
    Format { what: &'static str, offset: usize, len: usize, available: usize },
    /// Direct-policy palette count field encodes fewer than one palette
    #[error("invalid container: palette count field {field} yields {count} palettes")]
    InvalidContainer { field: u16, count: i32 },
    /// Heuristic-policy palette record whose name fails the validity predicate
    #[error("invalid palette record name {name:?} at {offset:#x}")]
    InvalidPaletteRecord { name: String, offset: usize },
    /// Declared pixel plane does not fit inside the buffer
    #[error("pixel plane of '{name}' at {offset:#x} (+{len}) exceeds container length {available}")]
    PixelPlaneOutOfRange { name: String, offset: usize, len: usize, available: usize },
    /// Width or height is zero or negative
    #[error("image '{name}' has invalid dimensions {width}x{height}")]
    InvalidDimensions { name: String, width: i16, height: i16 },
    /// Direct-policy palette selector points past the palette table
    #[error("image '{name}' selects palette {index} but only {available} palettes exist")]
    OutOfRangeColorIndex { name: String, index: i32, available: usize },
    /// Heuristic-policy image for which no palette covers every pixel
    #[error("no palette validates image '{name}'")]
    PaletteResolutionFailure { name: String },
}

impl DecodeError {
    /// Whether the error rejects the whole container rather than one image.
    pub fn is_container_level(&self) -> bool {
        matches!(
            self,
            DecodeError::Empty | DecodeError::Format { .. } | DecodeError::InvalidContainer { .. }
        )
    }

    /// Build a `Format` error for a region that does not fit in `available` bytes.
    pub(crate) fn out_of_bounds(what: &'static str, offset: usize, len: usize, available: usize) -> Self {
        DecodeError::Format { what, offset, len, available }
    }
}
