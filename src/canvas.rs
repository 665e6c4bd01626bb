//! Canvas normalization
//!
//! Animation frames are stored cropped to their own bounds. To keep frames of
//! one animation aligned, every member of a sequence (`WALK01`, `WALK02`, ...)
//! is rendered onto a shared canvas as large as the biggest member, anchored
//! at the bottom centre. Heuristic containers share one canvas across the
//! whole file instead.

use crate::policy::DecodePolicy;
use crate::resolve::Resolved;

/// Output raster size assigned to an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Smallest canvas holding both `self` and `other`.
    pub fn union(self, other: Canvas) -> Canvas {
        Canvas { width: self.width.max(other.width), height: self.height.max(other.height) }
    }

    /// Top-left corner of a `width` x `height` block placed bottom-centre.
    ///
    /// A block larger than the canvas is pinned to the top-left corner.
    pub fn anchor(&self, width: u32, height: u32) -> (u32, u32) {
        (self.width.saturating_sub(width) / 2, self.height.saturating_sub(height))
    }
}

/// Something with a name and a size that can be placed on a canvas.
pub trait Framed {
    fn frame_name(&self) -> &str;
    fn frame_size(&self) -> Canvas;
}

impl Framed for crate::image_table::DecodedImage {
    fn frame_name(&self) -> &str {
        &self.name
    }

    fn frame_size(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

impl Framed for Resolved<'_> {
    fn frame_name(&self) -> &str {
        &self.image.name
    }

    fn frame_size(&self) -> Canvas {
        self.image.frame_size()
    }
}

/// An item paired with the canvas it will be rendered on.
#[derive(Debug, Clone)]
pub struct Placement<T> {
    pub item: T,
    pub canvas: Canvas,
}

/// Sequence stem of a name: the name minus a trailing two-digit suffix.
///
/// Names shorter than three bytes never have a stem.
///
/// # Examples
///
/// ```
/// use palrip::canvas::sequence_stem;
///
/// assert_eq!(sequence_stem("WALK01"), Some("WALK"));
/// assert_eq!(sequence_stem("WALK1"), None);
/// assert_eq!(sequence_stem("01"), None);
/// ```
pub fn sequence_stem(name: &str) -> Option<&str> {
    let bytes = name.as_bytes();
    if bytes.len() < 3 {
        return None;
    }
    let split = bytes.len() - 2;
    if bytes[split..].iter().all(u8::is_ascii_digit) {
        Some(&name[..split])
    } else {
        None
    }
}

/// Smallest canvas holding every item.
pub fn bounding_canvas<'a, T: Framed + 'a>(items: impl IntoIterator<Item = &'a T>) -> Canvas {
    items.into_iter().fold(Canvas::default(), |acc, item| acc.union(item.frame_size()))
}

/// Sort by name and give each multi-member sequence its shared canvas.
///
/// Items without a stem, and stems with a single member, keep their own size.
pub fn normalize_sequences<T: Framed>(mut items: Vec<T>) -> Vec<Placement<T>> {
    items.sort_by(|a, b| a.frame_name().cmp(b.frame_name()));

    let mut canvases = Vec::with_capacity(items.len());
    let mut start = 0;
    while start < items.len() {
        let stem = sequence_stem(items[start].frame_name());
        let mut end = start + 1;
        if stem.is_some() {
            while end < items.len() && sequence_stem(items[end].frame_name()) == stem {
                end += 1;
            }
        }
        let canvas = bounding_canvas(&items[start..end]);
        canvases.extend(std::iter::repeat(canvas).take(end - start));
        start = end;
    }

    items.into_iter().zip(canvases).map(|(item, canvas)| Placement { item, canvas }).collect()
}

/// Place every item on the same canvas, keeping input order.
pub fn normalize_global<T: Framed>(items: Vec<T>, canvas: Canvas) -> Vec<Placement<T>> {
    items.into_iter().map(|item| Placement { canvas: canvas.union(item.frame_size()), item }).collect()
}

/// Apply the policy's normalization.
///
/// `extent` is the container-wide canvas used by the heuristic policy; when
/// `None` it is computed from `items`.
pub fn normalize<T: Framed>(items: Vec<T>, policy: DecodePolicy, extent: Option<Canvas>) -> Vec<Placement<T>> {
    match policy {
        DecodePolicy::Direct => normalize_sequences(items),
        DecodePolicy::Heuristic => {
            let canvas = extent.unwrap_or_else(|| bounding_canvas(&items));
            normalize_global(items, canvas)
        }
    }
}
