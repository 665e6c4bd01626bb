//! Indexed image rendering to RGBA buffers

use crate::canvas::{Canvas, Framed, Placement};
use crate::color::TRANSPARENT;
use crate::image_table::DecodedImage;
use crate::palette::Palette;
use crate::policy::DecodePolicy;
use crate::resolve::Resolved;
use image::{Rgba, RgbaImage};

/// One rendered output: an image drawn with one of its palettes.
#[derive(Debug, Clone)]
pub struct Raster {
    pub image_name: String,
    pub palette_index: usize,
    /// `<image-name>.png` or `<image-name>-p<palette-index>.png`
    pub file_name: String,
    pub image: RgbaImage,
}

/// Canvas fill colour for an image drawn with `palette`.
///
/// The direct policy uses the colour of the first pixel value in the raw
/// plane (stride padding included) that the palette covers, or transparent
/// when there is none. The heuristic policy is always transparent.
pub fn background(image: &DecodedImage, palette: &Palette, policy: DecodePolicy) -> Rgba<u8> {
    if !policy.fills_background() {
        return TRANSPARENT;
    }
    image
        .pixels
        .iter()
        .find_map(|&value| palette.get(value))
        .map(|color| policy.color_order().to_rgba(color))
        .unwrap_or(TRANSPARENT)
}

/// Render `image` with `palette` onto `canvas`, bottom-anchored and centred.
///
/// The canvas is grown to the image size if it is smaller. Pixel values the
/// palette does not cover leave the background showing.
///
/// # Examples
///
/// ```
/// use palrip::canvas::Canvas;
/// use palrip::image_table::DecodedImage;
/// use palrip::palette::Palette;
/// use palrip::policy::DecodePolicy;
/// use palrip::renderer::render;
///
/// let image = DecodedImage {
///     index: 0,
///     name: "DOT".to_string(),
///     width: 1,
///     height: 1,
///     palette_selector: 3,
///     pixels: vec![0, 0, 0, 0],
/// };
/// let palette = Palette { index: 0, name: "PAL".to_string(), colors: vec![0xFC00] };
///
/// let out = render(&image, &palette, Canvas::new(3, 2), DecodePolicy::Direct);
/// assert_eq!(out.dimensions(), (3, 2));
/// assert_eq!(out.get_pixel(1, 1).0, [255, 0, 0, 255]);
/// ```
pub fn render(image: &DecodedImage, palette: &Palette, canvas: Canvas, policy: DecodePolicy) -> RgbaImage {
    let canvas = canvas.union(image.frame_size());
    let order = policy.color_order();
    let mut out = RgbaImage::from_pixel(canvas.width, canvas.height, background(image, palette, policy));
    let (left, top) = canvas.anchor(image.width, image.height);

    for (y, row) in image.rows().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            if let Some(color) = palette.get(value) {
                out.put_pixel(left + x as u32, top + y as u32, order.to_rgba(color));
            }
        }
    }

    out
}

/// File name for an image rendered with one of `candidates` palettes.
pub fn output_file_name(image_name: &str, palette_index: usize, candidates: usize) -> String {
    if candidates > 1 {
        format!("{}-p{}.png", image_name, palette_index)
    } else {
        format!("{}.png", image_name)
    }
}

/// Render a placed image once per bound palette.
pub fn render_placement(placement: &Placement<Resolved<'_>>, policy: DecodePolicy) -> Vec<Raster> {
    let resolved = &placement.item;
    let candidates = resolved.palettes.len();
    resolved
        .palettes
        .iter()
        .map(|palette| Raster {
            image_name: resolved.image.name.clone(),
            palette_index: palette.index,
            file_name: output_file_name(&resolved.image.name, palette.index, candidates),
            image: render(resolved.image, palette, placement.canvas, policy),
        })
        .collect()
}
