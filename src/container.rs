//! Container header parsing
//!
//! # Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00 | u16 | image count |
//! | 0x02 | u16 | palette count field (biased, policy-dependent) |
//! | 0x04 | u32 | file table offset |
//!
//! The file table holds `image count` records of [`IMAGE_RECORD_SIZE`] bytes;
//! the palette table starts immediately after it.

use crate::error::DecodeError;
use byteorder::{ByteOrder, LittleEndian};

/// Size of the fixed container header.
pub const HEADER_SIZE: usize = 8;

/// Size of one file table (image) record.
pub const IMAGE_RECORD_SIZE: usize = 0x32;

/// Size of the NUL-padded name field shared by image and palette records.
pub const NAME_LEN: usize = 0xc;

/// Fixed header at the start of every container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub image_count: u16,
    pub palette_count_field: u16,
    pub file_table_offset: u32,
}

impl ContainerHeader {
    /// Offset of the palette table, directly after the file table.
    pub fn palette_table_offset(&self) -> usize {
        self.file_table_offset as usize + self.image_count as usize * IMAGE_RECORD_SIZE
    }
}

/// A parsed container borrowing its immutable input buffer.
#[derive(Debug, Clone, Copy)]
pub struct Container<'a> {
    data: &'a [u8],
    header: ContainerHeader,
}

impl<'a> Container<'a> {
    /// Parse the header and validate that the file table fits in the buffer.
    ///
    /// # Errors
    ///
    /// * `DecodeError::Empty` for a zero-length buffer (callers treat this as a no-op)
    /// * `DecodeError::Format` if the header or file table runs past the end
    pub fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Empty);
        }
        let raw = data
            .get(..HEADER_SIZE)
            .ok_or_else(|| DecodeError::out_of_bounds("header", 0, HEADER_SIZE, data.len()))?;

        let header = ContainerHeader {
            image_count: LittleEndian::read_u16(&raw[0..2]),
            palette_count_field: LittleEndian::read_u16(&raw[2..4]),
            file_table_offset: LittleEndian::read_u32(&raw[4..8]),
        };

        let table_len = header.image_count as usize * IMAGE_RECORD_SIZE;
        if header.palette_table_offset() > data.len() {
            return Err(DecodeError::out_of_bounds(
                "file table",
                header.file_table_offset as usize,
                table_len,
                data.len(),
            ));
        }

        Ok(Self { data, header })
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bounds-checked slice of `len` bytes at `offset`.
    pub fn region(&self, what: &'static str, offset: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| DecodeError::out_of_bounds(what, offset, len, self.data.len()))
    }

    /// Up to `len` bytes at `offset`, clamped to the end of the buffer.
    ///
    /// Used for diagnostic dumps, which never fail.
    pub fn clamped(&self, offset: usize, len: usize) -> &'a [u8] {
        let start = offset.min(self.data.len());
        let end = offset.saturating_add(len).min(self.data.len());
        &self.data[start..end]
    }

    /// The raw bytes of file table record `index`.
    ///
    /// # Errors
    ///
    /// Only fails for `index >= image_count`; records inside the count are
    /// guaranteed in range by [`Container::parse`].
    pub fn image_record(&self, index: usize) -> Result<&'a [u8; IMAGE_RECORD_SIZE], DecodeError> {
        let offset = self.header.file_table_offset as usize + index * IMAGE_RECORD_SIZE;
        if index >= self.header.image_count as usize {
            return Err(DecodeError::out_of_bounds(
                "image record",
                offset,
                IMAGE_RECORD_SIZE,
                self.header.palette_table_offset(),
            ));
        }
        let raw = self.region("image record", offset, IMAGE_RECORD_SIZE)?;
        raw.try_into()
            .map_err(|_| DecodeError::out_of_bounds("image record", offset, IMAGE_RECORD_SIZE, self.data.len()))
    }
}

/// Decode a NUL-padded name field; bytes after the first NUL are ignored.
pub fn read_name(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}
