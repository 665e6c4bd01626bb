//! File table decoding and pixel plane extraction
//!
//! Each file table record is [`IMAGE_RECORD_SIZE`] bytes:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00 | 12 | name (NUL padded) |
//! | 0x16 | i16 | width |
//! | 0x18 | i16 | height |
//! | 0x1a | i16 | palette selector (palette index + 3, direct policy only) |
//! | 0x1c | u32 | pixel plane offset |
//!
//! The pixel plane is one byte per pixel, each row padded to a multiple of
//! four bytes.

use crate::container::{read_name, Container, IMAGE_RECORD_SIZE, NAME_LEN};
use crate::diagnostics::Listing;
use crate::error::DecodeError;
use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, warn};

/// A file table record as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Name exactly as stored, up to the first NUL
    pub raw_name: String,
    pub width: i16,
    pub height: i16,
    pub palette_selector: i16,
    pub data_offset: u32,
}

impl ImageRecord {
    /// Parse a record from its raw bytes.
    pub fn parse(raw: &[u8; IMAGE_RECORD_SIZE]) -> Self {
        Self {
            raw_name: read_name(&raw[..NAME_LEN]),
            width: LittleEndian::read_i16(&raw[0x16..0x18]),
            height: LittleEndian::read_i16(&raw[0x18..0x1a]),
            palette_selector: LittleEndian::read_i16(&raw[0x1a..0x1c]),
            data_offset: LittleEndian::read_u32(&raw[0x1c..0x20]),
        }
    }

    /// Padded row length in bytes.
    pub fn stride(&self) -> usize {
        stride_for(self.width.max(0) as usize)
    }

    pub fn pixel_plane_len(&self) -> usize {
        self.stride() * self.height.max(0) as usize
    }
}

/// An image whose pixel plane has been sliced out of the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Position in the file table
    pub index: usize,
    /// Output name: leading `!` stripped, `/` replaced with `_`
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub palette_selector: i16,
    /// `stride * height` palette indices
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn stride(&self) -> usize {
        stride_for(self.width as usize)
    }

    /// Visible part of each row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let width = self.width as usize;
        self.pixels.chunks_exact(self.stride()).map(move |row| &row[..width])
    }

    /// Visible pixel values in row-major order, stride padding excluded.
    pub fn visible_pixels(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows().flat_map(|row| row.iter().copied())
    }
}

/// Result of walking the file table.
#[derive(Debug, Clone, Default)]
pub struct ImageTable {
    pub images: Vec<DecodedImage>,
    /// Images skipped because of bad dimensions or an out-of-range plane
    pub rejected: Vec<DecodeError>,
    /// Name listing and record dumps for `images.txt`
    pub listing: Listing,
}

/// Decode every file table record and slice its pixel plane.
///
/// Records that cannot be sliced are reported in [`ImageTable::rejected`]
/// and do not stop the walk.
pub fn decode_images(container: &Container<'_>) -> ImageTable {
    let count = container.header().image_count as usize;
    let mut table = ImageTable { images: Vec::with_capacity(count), ..ImageTable::default() };

    for index in 0..count {
        let raw = match container.image_record(index) {
            Ok(raw) => raw,
            Err(err) => {
                table.rejected.push(err);
                continue;
            }
        };
        let record = ImageRecord::parse(raw);
        table.listing.record(&record.raw_name, raw);

        match slice_image(container, index, &record) {
            Ok(image) => {
                debug!(image = %image.name, width = image.width, height = image.height, "decoded image");
                table.images.push(image);
            }
            Err(err) => {
                warn!(%err, "skipping image");
                table.rejected.push(err);
            }
        }
    }

    table
}

fn slice_image(container: &Container<'_>, index: usize, record: &ImageRecord) -> Result<DecodedImage, DecodeError> {
    let name = sanitize_name(&record.raw_name, index);
    if record.width <= 0 || record.height <= 0 {
        return Err(DecodeError::InvalidDimensions { name, width: record.width, height: record.height });
    }

    let offset = record.data_offset as usize;
    let len = record.pixel_plane_len();
    let pixels = match container.region("pixel plane", offset, len) {
        Ok(plane) => plane.to_vec(),
        Err(_) => {
            return Err(DecodeError::PixelPlaneOutOfRange { name, offset, len, available: container.len() })
        }
    };

    Ok(DecodedImage {
        index,
        name,
        width: record.width as u32,
        height: record.height as u32,
        palette_selector: record.palette_selector,
        pixels,
    })
}

/// Round a row width up to the next multiple of four.
pub fn stride_for(width: usize) -> usize {
    (width + 3) & !3
}

/// Turn a stored name into an output name.
///
/// Leading `!` marks are dropped so marked frames sort with the rest of
/// their sequence; `/` would otherwise create directories. A name left empty
/// falls back to `image<index>`.
pub fn sanitize_name(raw: &str, index: usize) -> String {
    let name = raw.trim_start_matches('!').replace('/', "_");
    if name.is_empty() {
        format!("image{}", index)
    } else {
        name
    }
}
