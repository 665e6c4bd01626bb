//! Shared helpers for building synthetic containers in memory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const HEADER_SIZE: usize = 8;
pub const IMAGE_RECORD_SIZE: usize = 0x32;
pub const PALETTE_RECORD_SIZE: usize = 0x12;
pub const DIRECT_PALETTE_STRIDE: usize = 0x1a;

/// One file table entry and its pixel plane.
#[derive(Debug, Clone)]
pub struct ImageSpec {
    pub name: Vec<u8>,
    pub width: i16,
    pub height: i16,
    pub selector: i16,
    /// Raw plane, stride padding included
    pub plane: Vec<u8>,
    /// Overrides the computed plane offset
    pub data_offset: Option<u32>,
}

impl ImageSpec {
    /// Image built from its visible rows; rows are zero padded to the stride.
    pub fn new(name: &str, rows: &[&[u8]]) -> Self {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let stride = (width + 3) & !3;
        let mut plane = Vec::with_capacity(stride * rows.len());
        for row in rows {
            let mut padded = row.to_vec();
            padded.resize(stride, 0);
            plane.extend(padded);
        }
        Self {
            name: name.as_bytes().to_vec(),
            width: width as i16,
            height: rows.len() as i16,
            selector: 3,
            plane,
            data_offset: None,
        }
    }

    /// Solid image of `width` x `height` filled with `value`.
    pub fn solid(name: &str, width: usize, height: usize, value: u8) -> Self {
        let row = vec![value; width];
        let rows: Vec<&[u8]> = (0..height).map(|_| row.as_slice()).collect();
        Self::new(name, &rows)
    }

    /// Select palette `index` (stored as `index + 3`).
    pub fn with_palette(mut self, index: i16) -> Self {
        self.selector = index + 3;
        self
    }

    pub fn with_plane(mut self, plane: Vec<u8>) -> Self {
        self.plane = plane;
        self
    }

    pub fn with_data_offset(mut self, offset: u32) -> Self {
        self.data_offset = Some(offset);
        self
    }

    pub fn with_size(mut self, width: i16, height: i16) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// One palette descriptor and its colour table.
#[derive(Debug, Clone)]
pub struct PaletteSpec {
    pub name: Vec<u8>,
    pub colors: Vec<u16>,
    /// Overrides the stored colour count
    pub color_count: Option<i16>,
}

/// Builds a container with the layout
/// `header | file table | palette table | colour tables | pixel planes`.
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
    direct: bool,
    images: Vec<ImageSpec>,
    palettes: Vec<PaletteSpec>,
    palette_count_field: Option<u16>,
    terminate_scan: bool,
}

impl ContainerBuilder {
    /// Direct layout: biased palette count, padded palette records.
    pub fn direct() -> Self {
        Self { direct: true, images: vec![], palettes: vec![], palette_count_field: None, terminate_scan: false }
    }

    /// Heuristic layout: packed palette records followed by a NUL-named
    /// record that ends the scan.
    pub fn heuristic() -> Self {
        Self { direct: false, images: vec![], palettes: vec![], palette_count_field: None, terminate_scan: true }
    }

    pub fn image(mut self, image: ImageSpec) -> Self {
        self.images.push(image);
        self
    }

    pub fn palette(mut self, name: &str, colors: &[u16]) -> Self {
        self.palettes.push(PaletteSpec { name: name.as_bytes().to_vec(), colors: colors.to_vec(), color_count: None });
        self
    }

    pub fn palette_spec(mut self, spec: PaletteSpec) -> Self {
        self.palettes.push(spec);
        self
    }

    pub fn palette_count_field(mut self, field: u16) -> Self {
        self.palette_count_field = Some(field);
        self
    }

    pub fn palette_table_offset(&self) -> usize {
        HEADER_SIZE + self.images.len() * IMAGE_RECORD_SIZE
    }

    fn palette_table_len(&self) -> usize {
        let n = self.palettes.len();
        if self.direct {
            if n == 0 {
                0
            } else {
                (n - 1) * DIRECT_PALETTE_STRIDE + PALETTE_RECORD_SIZE
            }
        } else {
            let terminator = if self.terminate_scan { PALETTE_RECORD_SIZE } else { 0 };
            n * PALETTE_RECORD_SIZE + terminator
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let palette_table = self.palette_table_offset();
        let palette_stride = if self.direct { DIRECT_PALETTE_STRIDE } else { PALETTE_RECORD_SIZE };

        let mut colors_at = Vec::with_capacity(self.palettes.len());
        let mut cursor = palette_table + self.palette_table_len();
        for palette in &self.palettes {
            colors_at.push(cursor);
            cursor += palette.colors.len() * 2;
        }
        let mut planes_at = Vec::with_capacity(self.images.len());
        for image in &self.images {
            planes_at.push(cursor);
            cursor += image.plane.len();
        }

        let mut data = vec![0u8; cursor];
        let field = self.palette_count_field.unwrap_or((self.palettes.len() + 3) as u16);
        data[0..2].copy_from_slice(&(self.images.len() as u16).to_le_bytes());
        data[2..4].copy_from_slice(&field.to_le_bytes());
        data[4..8].copy_from_slice(&(HEADER_SIZE as u32).to_le_bytes());

        for (i, image) in self.images.iter().enumerate() {
            let rec = HEADER_SIZE + i * IMAGE_RECORD_SIZE;
            write_name(&mut data[rec..rec + 12], &image.name);
            data[rec + 0x16..rec + 0x18].copy_from_slice(&image.width.to_le_bytes());
            data[rec + 0x18..rec + 0x1a].copy_from_slice(&image.height.to_le_bytes());
            data[rec + 0x1a..rec + 0x1c].copy_from_slice(&image.selector.to_le_bytes());
            let offset = image.data_offset.unwrap_or(planes_at[i] as u32);
            data[rec + 0x1c..rec + 0x20].copy_from_slice(&offset.to_le_bytes());
            data[planes_at[i]..planes_at[i] + image.plane.len()].copy_from_slice(&image.plane);
        }

        for (i, palette) in self.palettes.iter().enumerate() {
            let rec = palette_table + i * palette_stride;
            write_name(&mut data[rec..rec + 12], &palette.name);
            let count = palette.color_count.unwrap_or(palette.colors.len() as i16);
            data[rec + 0x0c..rec + 0x0e].copy_from_slice(&count.to_le_bytes());
            data[rec + 0x0e..rec + 0x12].copy_from_slice(&(colors_at[i] as u32).to_le_bytes());
            for (j, color) in palette.colors.iter().enumerate() {
                let at = colors_at[i] + j * 2;
                data[at..at + 2].copy_from_slice(&color.to_le_bytes());
            }
        }

        data
    }

    /// Build and write to `dir/name`.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).expect("should write container");
        path
    }
}

fn write_name(field: &mut [u8], name: &[u8]) {
    let len = name.len().min(field.len());
    field[..len].copy_from_slice(&name[..len]);
}

/// RGB555 colours as stored by direct containers.
pub mod rgb555 {
    pub const BLACK: u16 = 0x0000;
    pub const WHITE: u16 = 0x7FFF;
    pub const RED: u16 = 0x7C00;
    pub const GREEN: u16 = 0x03E0;
    pub const BLUE: u16 = 0x001F;
}

/// Sorted names of the PNG files in `dir`.
pub fn png_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|n| n.ends_with(".png"))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Load a PNG as RGBA.
pub fn load_rgba(path: &Path) -> image::RgbaImage {
    image::open(path).expect("should open output image").to_rgba8()
}
