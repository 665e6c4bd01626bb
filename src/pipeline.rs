//! Per-container extraction pipeline
//!
//! Drives one container through every decode stage and writes its artifacts:
//!
//! 1. parse the header ([`Container::parse`])
//! 2. decode the palette table ([`decode_palettes`])
//! 3. slice every image ([`decode_images`])
//! 4. bind palettes ([`resolve_all`])
//! 5. assign canvases ([`normalize`])
//! 6. render one raster per (image, palette) pair
//!
//! Stages 1 and 2 fail the whole container. Later stages only drop the
//! affected image, which is reported in [`ContainerOutput::issues`].

use crate::canvas::{bounding_canvas, normalize, Canvas, Placement};
use crate::container::{Container, ContainerHeader};
use crate::error::DecodeError;
use crate::image_table::{decode_images, ImageTable};
use crate::output::{
    container_output_dir, save_png, scale_image, write_text, OutputError, IMAGE_LISTING_FILE,
    PALETTE_LISTING_FILE,
};
use crate::palette::{decode_palettes, PaletteTable};
use crate::policy::DecodePolicy;
use crate::renderer::{render_placement, Raster};
use crate::resolve::{resolve_all, Resolved};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Options for extracting a single container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub policy: DecodePolicy,
    /// Nearest-neighbour upscale factor applied before writing
    pub scale: u8,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { policy: DecodePolicy::Direct, scale: 1 }
    }
}

/// Error that stops a whole container.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input file could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Header or palette table could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Artifacts could not be written
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl ExtractError {
    /// Whether the input was simply empty and nothing needed doing.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, ExtractError::Decode(DecodeError::Empty))
    }
}

/// Decoded tables of one container, before resolution.
#[derive(Debug, Clone)]
pub struct DecodedTables {
    pub policy: DecodePolicy,
    pub header: ContainerHeader,
    pub palettes: PaletteTable,
    pub images: ImageTable,
}

impl DecodedTables {
    /// Bind palettes and assign canvases.
    ///
    /// Returns the placed images and the per-image resolution failures.
    pub fn place(&self) -> (Vec<Placement<Resolved<'_>>>, Vec<DecodeError>) {
        let (resolved, failures) = resolve_all(&self.images.images, &self.palettes.palettes, self.policy);
        let extent = self.container_extent();
        (normalize(resolved, self.policy, extent), failures)
    }

    /// Container-wide canvas used by the heuristic policy: every decoded
    /// image counts, whether or not a palette validates it.
    fn container_extent(&self) -> Option<Canvas> {
        match self.policy {
            DecodePolicy::Direct => None,
            DecodePolicy::Heuristic => Some(bounding_canvas(&self.images.images)),
        }
    }
}

/// Everything produced from one container, ready to be written.
#[derive(Debug, Clone)]
pub struct ContainerOutput {
    pub header: ContainerHeader,
    pub palette_count: usize,
    pub image_count: usize,
    pub rasters: Vec<Raster>,
    pub palette_listing: String,
    pub image_listing: String,
    /// Images that were skipped, in the order they were found
    pub issues: Vec<DecodeError>,
}

/// Summary of a written container.
#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub output_dir: PathBuf,
    pub palettes: usize,
    pub images: usize,
    /// PNG files written
    pub written: usize,
    pub issues: Vec<DecodeError>,
}

/// Parse the header and decode the palette and file tables.
///
/// # Errors
///
/// Any container-level [`DecodeError`]: `Empty`, `Format` or `InvalidContainer`.
pub fn decode_tables(data: &[u8], policy: DecodePolicy) -> Result<DecodedTables, DecodeError> {
    let container = Container::parse(data)?;
    let header = *container.header();
    debug!(
        images = header.image_count,
        palette_field = header.palette_count_field,
        file_table = header.file_table_offset,
        "parsed header"
    );
    let palettes = decode_palettes(&container, policy)?;
    let images = decode_images(&container);
    Ok(DecodedTables { policy, header, palettes, images })
}

/// Decode and render a container held in memory.
///
/// # Errors
///
/// Container-level decode errors only; per-image failures end up in
/// [`ContainerOutput::issues`].
pub fn decode_container(data: &[u8], policy: DecodePolicy) -> Result<ContainerOutput, DecodeError> {
    let tables = decode_tables(data, policy)?;
    let (placements, failures) = tables.place();

    let rasters: Vec<Raster> =
        placements.par_iter().flat_map_iter(|placement| render_placement(placement, policy)).collect();

    let mut issues = tables.images.rejected.clone();
    issues.extend(failures);

    Ok(ContainerOutput {
        header: tables.header,
        palette_count: tables.palettes.len(),
        image_count: tables.images.images.len(),
        rasters,
        palette_listing: tables.palettes.listing.as_str().to_string(),
        image_listing: tables.images.listing.as_str().to_string(),
        issues,
    })
}

/// Write listings and rasters into `dir`.
///
/// Returns the paths of the PNG files written.
pub fn write_container(output: &ContainerOutput, dir: &Path, scale: u8) -> Result<Vec<PathBuf>, OutputError> {
    write_text(&output.palette_listing, &dir.join(PALETTE_LISTING_FILE))?;
    write_text(&output.image_listing, &dir.join(IMAGE_LISTING_FILE))?;

    let mut written = Vec::with_capacity(output.rasters.len());
    let mut seen = HashSet::with_capacity(output.rasters.len());
    for raster in &output.rasters {
        if !seen.insert(raster.file_name.as_str()) {
            warn!(file = %raster.file_name, image = %raster.image_name, "duplicate output name, overwriting earlier image");
        }
        let path = dir.join(&raster.file_name);
        let image = scale_image(raster.image.clone(), scale);
        save_png(&image, &path)?;
        debug!(path = %path.display(), "wrote image");
        written.push(path);
    }
    Ok(written)
}

/// Extract one container file into `<output_root>/<file-name>/`.
///
/// Nothing is written when the container itself cannot be decoded.
pub fn extract_file(input: &Path, output_root: &Path, options: &ExtractOptions) -> Result<ExtractReport, ExtractError> {
    let data = std::fs::read(input).map_err(|source| ExtractError::Read { path: input.to_path_buf(), source })?;
    let output = decode_container(&data, options.policy)?;
    let output_dir = container_output_dir(output_root, input);
    let written = write_container(&output, &output_dir, options.scale)?;

    if !output.issues.is_empty() {
        warn!(file = %input.display(), skipped = output.issues.len(), "some images were skipped");
    }
    info!(
        file = %input.display(),
        palettes = output.palette_count,
        images = output.image_count,
        written = written.len(),
        "extracted container"
    );

    Ok(ExtractReport {
        output_dir,
        palettes: output.palette_count,
        images: output.image_count,
        written: written.len(),
        issues: output.issues,
    })
}
