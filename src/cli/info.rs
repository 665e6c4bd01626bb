//! Info command implementation

use std::fmt::Write;
use std::path::Path;
use std::process::ExitCode;

use crate::pipeline::{decode_tables, DecodedTables};
use crate::policy::DecodePolicy;

use super::{resolve_config, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the info command
pub fn run_info(file: &Path, policy: Option<DecodePolicy>) -> ExitCode {
    let policy = match policy {
        Some(policy) => policy,
        None => match resolve_config(None) {
            Ok(config) => config.decode.policy,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        },
    };

    let data = match std::fs::read(file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", file.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match decode_tables(&data, policy) {
        Ok(tables) => {
            print!("{}", format_info(&file.display().to_string(), data.len(), &tables));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}: {}", file.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Human-readable description of a decoded container.
fn format_info(name: &str, len: usize, tables: &DecodedTables) -> String {
    let header = &tables.header;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Container: {} ({} bytes)", name, len);
    let _ = writeln!(out, "Policy: {}", tables.policy);
    let _ = writeln!(
        out,
        "Header: {} images, palette field {}, file table at {:#x}, palette table at {:#x}",
        header.image_count,
        header.palette_count_field,
        header.file_table_offset,
        header.palette_table_offset()
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Palettes ({}):", tables.palettes.len());
    for palette in &tables.palettes.palettes {
        let _ = writeln!(out, "  [{}] {:<12} {} colours", palette.index, palette.name, palette.color_count());
    }
    if let Some(stop) = &tables.palettes.stopped_at {
        let _ = writeln!(out, "  scan stopped: {}", stop);
    }

    let (placements, failures) = tables.place();
    let _ = writeln!(out);
    let _ = writeln!(out, "Images ({}):", placements.len());
    for placement in &placements {
        let image = placement.item.image;
        let palettes: Vec<String> = placement.item.palettes.iter().map(|p| p.index.to_string()).collect();
        let _ = writeln!(
            out,
            "  {:<12} {}x{} palette {} canvas {}x{}",
            image.name,
            image.width,
            image.height,
            palettes.join(","),
            placement.canvas.width,
            placement.canvas.height
        );
    }

    let skipped: Vec<String> =
        tables.images.rejected.iter().chain(failures.iter()).map(|err| err.to_string()).collect();
    if !skipped.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Skipped ({}):", skipped.len());
        for reason in skipped {
            let _ = writeln!(out, "  {}", reason);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(palette_name: &[u8]) -> Vec<u8> {
        // header, one 1x1 image, one palette with two colours, then the plane
        let palette_table = 8 + 0x32;
        let colors_at = palette_table + 0x12;
        let plane_at = colors_at + 4;
        let mut data = vec![0u8; plane_at + 4];
        data[0..2].copy_from_slice(&1u16.to_le_bytes());
        data[2..4].copy_from_slice(&4u16.to_le_bytes());
        data[4..8].copy_from_slice(&8u32.to_le_bytes());
        data[8..12].copy_from_slice(b"LOGO");
        data[8 + 0x16..8 + 0x18].copy_from_slice(&1i16.to_le_bytes());
        data[8 + 0x18..8 + 0x1a].copy_from_slice(&1i16.to_le_bytes());
        data[8 + 0x1a..8 + 0x1c].copy_from_slice(&3i16.to_le_bytes());
        data[8 + 0x1c..8 + 0x20].copy_from_slice(&(plane_at as u32).to_le_bytes());
        data[palette_table..palette_table + palette_name.len()].copy_from_slice(palette_name);
        data[palette_table + 0x0c..palette_table + 0x0e].copy_from_slice(&2i16.to_le_bytes());
        data[palette_table + 0x0e..palette_table + 0x12].copy_from_slice(&(colors_at as u32).to_le_bytes());
        data[plane_at] = 1;
        data
    }

    #[test]
    fn test_format_info_direct() {
        let data = container(b"TITLE_PAL");
        let tables = decode_tables(&data, DecodePolicy::Direct).unwrap();
        let text = format_info("LOGO.IMG", data.len(), &tables);

        assert!(text.starts_with("Container: LOGO.IMG ("));
        assert!(text.contains("Policy: direct"));
        assert!(text.contains("palette table at 0x3a"));
        assert!(text.contains("Palettes (1):"));
        assert!(text.contains("[0] TITLE_PAL"));
        assert!(text.contains("LOGO         1x1 palette 0 canvas 1x1"));
        assert!(!text.contains("Skipped"));
    }

    #[test]
    fn test_format_info_heuristic_lists_skipped() {
        let data = container(b"X");
        let tables = decode_tables(&data, DecodePolicy::Heuristic).unwrap();
        let text = format_info("LOGO.IMG", data.len(), &tables);

        assert!(text.contains("Palettes (0):"));
        assert!(text.contains("scan stopped"));
        assert!(text.contains("Images (0):"));
        assert!(text.contains("Skipped (1):"));
        assert!(text.contains("no palette validates image 'LOGO'"));
    }
}
