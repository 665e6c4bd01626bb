//! PNG output, diagnostic text files and output path generation

use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Palette listing written next to the images of each container.
pub const PALETTE_LISTING_FILE: &str = "palettes.txt";

/// Image record listing written next to the images of each container.
pub const IMAGE_LISTING_FILE: &str = "images.txt";

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Write a text artifact, creating parent directories.
pub fn write_text(contents: &str, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    std::fs::write(path, contents)?;
    Ok(())
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// A factor of 0 or 1 returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    let new_w = w * factor as u32;
    let new_h = h * factor as u32;
    image::imageops::resize(&image, new_w, new_h, FilterType::Nearest)
}

/// Directory receiving the artifacts of one container.
///
/// | Input | Output root | Directory |
/// |-------|-------------|-----------|
/// | `data/ARENA.IMG` | `out` | `out/ARENA.IMG` |
/// | `ARENA.IMG` | `out/` | `out/ARENA.IMG` |
///
/// The full file name (extension included) is kept so `X.IMG` and `X.BIN`
/// never collide.
pub fn container_output_dir(output_root: &Path, input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "container".to_string());
    output_root.join(file_name)
}
