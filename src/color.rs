//! 15-bit colour conversion
//!
//! Palette entries are stored as `u16` values with five bits per channel.
//! The high bit is forced on at load time and carries no meaning here.

use image::Rgba;

/// Fully transparent pixel, used when no background colour applies.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Bit set on every palette entry after load.
pub const HIGH_BIT: u16 = 0x8000;

/// Channel packing of a 15-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorOrder {
    /// red = bits 10-14, green = bits 5-9, blue = bits 0-4
    Rgb555,
    /// red = bits 0-4, green = bits 5-9, blue = bits 10-14
    Bgr555,
}

impl ColorOrder {
    /// Convert a packed 15-bit colour to opaque RGBA.
    ///
    /// # Examples
    ///
    /// ```
    /// use palrip::color::ColorOrder;
    /// use image::Rgba;
    ///
    /// assert_eq!(ColorOrder::Rgb555.to_rgba(0x7C00), Rgba([255, 0, 0, 255]));
    /// assert_eq!(ColorOrder::Bgr555.to_rgba(0x7C00), Rgba([0, 0, 255, 255]));
    /// ```
    pub fn to_rgba(&self, value: u16) -> Rgba<u8> {
        let low = value & 0x1f;
        let mid = (value >> 5) & 0x1f;
        let high = (value >> 10) & 0x1f;
        let (r, g, b) = match self {
            ColorOrder::Rgb555 => (high, mid, low),
            ColorOrder::Bgr555 => (low, mid, high),
        };
        Rgba([scale5(r), scale5(g), scale5(b), 255])
    }
}

/// Expand a 5-bit channel to 8 bits (`c * 255 / 31`, truncating).
pub fn scale5(channel: u16) -> u8 {
    ((channel & 0x1f) as u32 * 255 / 31) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_is_opaque_black() {
        assert_eq!(ColorOrder::Rgb555.to_rgba(0x0000), Rgba([0, 0, 0, 255]));
        assert_eq!(ColorOrder::Bgr555.to_rgba(0x0000), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_full_channels_map_to_255() {
        assert_eq!(ColorOrder::Rgb555.to_rgba(0x7C00), Rgba([255, 0, 0, 255]));
        assert_eq!(ColorOrder::Rgb555.to_rgba(0x03E0), Rgba([0, 255, 0, 255]));
        assert_eq!(ColorOrder::Rgb555.to_rgba(0x001F), Rgba([0, 0, 255, 255]));
        assert_eq!(ColorOrder::Bgr555.to_rgba(0x001F), Rgba([255, 0, 0, 255]));
        assert_eq!(ColorOrder::Bgr555.to_rgba(0x7C00), Rgba([0, 0, 255, 255]));
        assert_eq!(ColorOrder::Rgb555.to_rgba(0x7FFF), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_high_bit_ignored() {
        assert_eq!(ColorOrder::Rgb555.to_rgba(0x7FFF | HIGH_BIT), ColorOrder::Rgb555.to_rgba(0x7FFF));
        assert_eq!(ColorOrder::Bgr555.to_rgba(HIGH_BIT), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_scale5_is_monotonic() {
        assert_eq!(scale5(0), 0);
        assert_eq!(scale5(1), 8);
        assert_eq!(scale5(16), 131);
        assert_eq!(scale5(31), 255);
        for c in 1..32 {
            assert!(scale5(c) > scale5(c - 1));
        }
    }
}
