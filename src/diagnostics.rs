//! Diagnostic text listings
//!
//! Every record read from a container is echoed into a plain-text listing:
//! its name followed by a verbatim hex dump of the record bytes, 16 bytes per
//! line. Listings are written next to the rendered images as `palettes.txt`
//! and `images.txt` so unknown fields can be studied by hand.

use std::fmt::Write;

/// Bytes per hex dump line.
pub const DUMP_LINE_LEN: usize = 16;

/// Format bytes as upper-case hex pairs, each followed by a space, 16 per line.
///
/// Lines are separated by `\n`; there is no trailing newline.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3 + bytes.len() / DUMP_LINE_LEN);
    for (i, line) in bytes.chunks(DUMP_LINE_LEN).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for byte in line {
            // Writing to a String cannot fail
            let _ = write!(out, "{:02X} ", byte);
        }
    }
    out
}

/// An append-only text listing of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    text: String,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a free-form line.
    pub fn line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
    }

    /// Append a record: its name, then the hex dump of its bytes.
    pub fn record(&mut self, name: &str, bytes: &[u8]) {
        self.line(name);
        self.line(hex_dump(bytes));
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}
