//! Palette table decoding
//!
//! The palette table starts right after the file table. Each record is
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00 | 12 | name (NUL padded) |
//! | 0x0c | i16 | colour count |
//! | 0x0e | u32 | colour table offset |
//!
//! Direct containers pad every record but the last with 8 bytes and store the
//! palette count (biased by 3) in the header. Heuristic containers pack the
//! records back to back and give no count, so the table is scanned until a
//! record name stops looking like a name.

use crate::container::{read_name, Container, NAME_LEN};
use crate::diagnostics::Listing;
use crate::error::DecodeError;
use crate::policy::DecodePolicy;
use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

/// Size of a palette descriptor.
pub const PALETTE_RECORD_SIZE: usize = 0x12;

/// Distance between direct-policy records (descriptor plus padding).
pub const DIRECT_PALETTE_STRIDE: usize = 0x1a;

/// Bytes dumped per record in `palettes.txt`, in both policies.
///
/// Heuristic records sit 0x12 apart, so consecutive dumps overlap.
pub const PALETTE_DUMP_LEN: usize = DIRECT_PALETTE_STRIDE;

/// Bias applied to the header palette count and to image palette selectors.
pub const PALETTE_BIAS: i32 = 3;

/// Marker that always makes a heuristic record name acceptable.
const PALETTE_NAME_MARKER: &[u8] = b"_P";

/// Shortest run of name characters accepted without the marker.
const MIN_NAME_RUN: usize = 6;

/// A palette descriptor as stored in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteRecord {
    pub name: String,
    pub color_count: i16,
    pub color_table_offset: u32,
    /// Where the descriptor itself starts in the container
    pub record_offset: usize,
}

/// A decoded palette: its colour table with the high bit set on every entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Position in decode order
    pub index: usize,
    pub name: String,
    pub colors: Vec<u16>,
}

impl Palette {
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Whether `value` is a valid index into this palette.
    pub fn covers(&self, value: u8) -> bool {
        (value as usize) < self.colors.len()
    }

    pub fn get(&self, value: u8) -> Option<u16> {
        self.colors.get(value as usize).copied()
    }
}

/// Result of decoding a palette table.
#[derive(Debug, Clone, Default)]
pub struct PaletteTable {
    pub palettes: Vec<Palette>,
    /// Name listing and descriptor dumps for `palettes.txt`
    pub listing: Listing,
    /// The record that ended a heuristic scan early, if any
    pub stopped_at: Option<DecodeError>,
}

impl PaletteTable {
    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Palette> {
        self.palettes.get(index)
    }
}

/// Decode the palette table using the given policy.
///
/// # Errors
///
/// Only the direct policy fails; see [`decode_direct`].
pub fn decode_palettes(container: &Container<'_>, policy: DecodePolicy) -> Result<PaletteTable, DecodeError> {
    match policy {
        DecodePolicy::Direct => decode_direct(container),
        DecodePolicy::Heuristic => Ok(decode_heuristic(container)),
    }
}

/// Decode exactly `palette_count_field - 3` padded records.
///
/// # Errors
///
/// * `DecodeError::InvalidContainer` if the count is below one
/// * `DecodeError::Format` if a record or its colour table is out of bounds
pub fn decode_direct(container: &Container<'_>) -> Result<PaletteTable, DecodeError> {
    let field = container.header().palette_count_field;
    let count = field as i32 - PALETTE_BIAS;
    if count < 1 {
        return Err(DecodeError::InvalidContainer { field, count });
    }

    let table_offset = container.header().palette_table_offset();
    let mut palettes = Vec::with_capacity(count as usize);
    let mut dumps = Vec::with_capacity(count as usize);

    for index in 0..count as usize {
        let offset = table_offset + index * DIRECT_PALETTE_STRIDE;
        let record = parse_record(container, offset)?;
        debug!(palette = %record.name, index, "reading palette");
        dumps.push((record.name.clone(), container.clamped(offset, PALETTE_DUMP_LEN)));
        let colors = read_colors(container, &record)?;
        palettes.push(Palette { index, name: record.name, colors });
    }

    let listing = build_listing(palettes.len(), &dumps, None);
    Ok(PaletteTable { palettes, listing, stopped_at: None })
}

/// Scan packed records until one fails the name predicate or its colour
/// table is out of bounds. Everything decoded before the stop is kept.
pub fn decode_heuristic(container: &Container<'_>) -> PaletteTable {
    let table_offset = container.header().palette_table_offset();
    let capacity = container.len().saturating_sub(table_offset) / PALETTE_RECORD_SIZE;
    let mut palettes = Vec::new();
    let mut dumps = Vec::new();
    let mut stopped_at = None;

    for index in 0..capacity {
        let offset = table_offset + index * PALETTE_RECORD_SIZE;
        let name_field = container.clamped(offset, NAME_LEN);
        if !is_valid_palette_name(name_field) {
            let err = DecodeError::InvalidPaletteRecord { name: read_name(name_field), offset };
            debug!(%err, decoded = palettes.len(), "palette scan stopped");
            stopped_at = Some(err);
            break;
        }

        let record = match parse_record(container, offset) {
            Ok(record) => record,
            Err(err) => {
                stopped_at = Some(err);
                break;
            }
        };
        let colors = match read_colors(container, &record) {
            Ok(colors) => colors,
            Err(err) => {
                debug!(palette = %record.name, %err, "palette colour table out of range, scan stopped");
                stopped_at = Some(err);
                break;
            }
        };
        debug!(palette = %record.name, index, colors = colors.len(), "reading palette");
        dumps.push((record.name.clone(), container.clamped(offset, PALETTE_DUMP_LEN)));
        palettes.push(Palette { index, name: record.name, colors });
    }

    let listing = build_listing(palettes.len(), &dumps, stopped_at.as_ref());
    PaletteTable { palettes, listing, stopped_at }
}

/// Heuristic name test on a raw 12-byte name field.
///
/// A name is accepted if it contains `_P`, or if its first byte outside
/// `[A-Za-z0-9_-]` sits past index 5. A NUL terminator counts as such a byte;
/// a field without one counts as ending at its length.
pub fn is_valid_palette_name(field: &[u8]) -> bool {
    let field = &field[..field.len().min(NAME_LEN)];
    let name_end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    if field[..name_end].windows(PALETTE_NAME_MARKER.len()).any(|w| w == PALETTE_NAME_MARKER) {
        return true;
    }
    let first_invalid = field.iter().position(|&b| !is_name_byte(b)).unwrap_or(field.len());
    first_invalid >= MIN_NAME_RUN
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_record(container: &Container<'_>, offset: usize) -> Result<PaletteRecord, DecodeError> {
    let raw = container.region("palette record", offset, PALETTE_RECORD_SIZE)?;
    Ok(PaletteRecord {
        name: read_name(&raw[..NAME_LEN]),
        color_count: LittleEndian::read_i16(&raw[0x0c..0x0e]),
        color_table_offset: LittleEndian::read_u32(&raw[0x0e..0x12]),
        record_offset: offset,
    })
}

/// Load a record's colour table, forcing the high bit on every entry.
fn read_colors(container: &Container<'_>, record: &PaletteRecord) -> Result<Vec<u16>, DecodeError> {
    if record.color_count < 0 {
        debug!(palette = %record.name, count = record.color_count, "negative colour count, empty palette");
        return Ok(Vec::new());
    }
    let count = record.color_count as usize;
    let raw = container.region("palette colour table", record.color_table_offset as usize, count * 2)?;
    Ok(raw.chunks_exact(2).map(|pair| LittleEndian::read_u16(pair) | crate::color::HIGH_BIT).collect())
}

fn build_listing(count: usize, dumps: &[(String, &[u8])], stopped_at: Option<&DecodeError>) -> Listing {
    let mut listing = Listing::new();
    listing.line(format!("Found {} palettes:", count));
    for (name, bytes) in dumps {
        listing.record(name, bytes);
    }
    if let Some(err) = stopped_at {
        listing.line(format!("Scan stopped: {}", err));
    }
    listing
}
