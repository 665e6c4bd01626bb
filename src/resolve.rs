//! Palette resolution
//!
//! Direct containers name each image's palette explicitly. Heuristic
//! containers do not, so every palette is tried against the image: a palette
//! is a candidate when every pixel value indexes inside it.

use crate::error::DecodeError;
use crate::image_table::DecodedImage;
use crate::palette::{Palette, PALETTE_BIAS};
use crate::policy::DecodePolicy;
use rayon::prelude::*;
use tracing::{debug, warn};

/// An image together with the palettes it will be rendered with.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    pub image: &'a DecodedImage,
    /// Exactly one palette for direct containers, one or more for heuristic
    pub palettes: Vec<&'a Palette>,
}

/// Whether every visible pixel of `image` is a valid index into `palette`.
///
/// Only the `width` visible bytes of each row are checked; stride padding is
/// never drawn and never rules a palette out. This differs from
/// [`crate::renderer::background`], which scans the raw plane padding
/// included. Stops at the first pixel outside the palette.
pub fn palette_validates(image: &DecodedImage, palette: &Palette) -> bool {
    image.visible_pixels().all(|value| palette.covers(value))
}

/// Bind the palette named by the image's selector.
///
/// # Errors
///
/// `DecodeError::OutOfRangeColorIndex` if `selector - 3` is not a palette index.
pub fn resolve_direct<'p>(image: &DecodedImage, palettes: &'p [Palette]) -> Result<&'p Palette, DecodeError> {
    let index = image.palette_selector as i32 - PALETTE_BIAS;
    usize::try_from(index).ok().and_then(|i| palettes.get(i)).ok_or_else(|| {
        DecodeError::OutOfRangeColorIndex { name: image.name.clone(), index, available: palettes.len() }
    })
}

/// Collect every palette that validates the image, in decode order.
///
/// # Errors
///
/// `DecodeError::PaletteResolutionFailure` if no palette validates.
pub fn resolve_heuristic<'p>(image: &DecodedImage, palettes: &'p [Palette]) -> Result<Vec<&'p Palette>, DecodeError> {
    let candidates: Vec<&Palette> =
        palettes.par_iter().filter(|palette| palette_validates(image, palette)).collect();

    if candidates.is_empty() {
        return Err(DecodeError::PaletteResolutionFailure { name: image.name.clone() });
    }
    Ok(candidates)
}

/// Resolve every image, splitting successes from per-image failures.
pub fn resolve_all<'a>(
    images: &'a [DecodedImage],
    palettes: &'a [Palette],
    policy: DecodePolicy,
) -> (Vec<Resolved<'a>>, Vec<DecodeError>) {
    let mut resolved = Vec::with_capacity(images.len());
    let mut failures = Vec::new();

    for image in images {
        let outcome = match policy {
            DecodePolicy::Direct => resolve_direct(image, palettes).map(|p| vec![p]),
            DecodePolicy::Heuristic => resolve_heuristic(image, palettes),
        };
        match outcome {
            Ok(bound) => {
                debug!(
                    image = %image.name,
                    palettes = ?bound.iter().map(|p| p.index).collect::<Vec<_>>(),
                    "resolved palettes"
                );
                resolved.push(Resolved { image, palettes: bound });
            }
            Err(err) => {
                warn!(%err, "skipping image");
                failures.push(err);
            }
        }
    }

    (resolved, failures)
}
