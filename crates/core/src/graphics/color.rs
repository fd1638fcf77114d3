//! Color conversion utilities.
//!
//! Packed colors are ARGB8888 (`0xAARRGGBB`). Console colors arrive as
//! 15-bit BGR555 words (`0bbbbbgggggrrrrr`).

/// Color operation utilities
pub struct ColorOps;

impl ColorOps {
    /// Expand a BGR555 word into an opaque ARGB8888 color.
    ///
    /// Each 5-bit channel is multiplied by 8, so full intensity is `0xF8`,
    /// not `0xFF`.
    ///
    /// ```
    /// use bbg_core::graphics::ColorOps;
    ///
    /// assert_eq!(ColorOps::from_bgr555(0x7FFF), 0xFFF8F8F8);
    /// ```
    #[inline]
    pub fn from_bgr555(word: u16) -> u32 {
        let b = ((word >> 10) & 31) as u8 * 8;
        let g = ((word >> 5) & 31) as u8 * 8;
        let r = (word & 31) as u8 * 8;
        Self::from_rgb(r, g, b)
    }

    /// Extract red channel from ARGB color
    #[inline]
    pub fn red(color: u32) -> u8 {
        ((color >> 16) & 0xFF) as u8
    }

    /// Extract green channel from ARGB color
    #[inline]
    pub fn green(color: u32) -> u8 {
        ((color >> 8) & 0xFF) as u8
    }

    /// Extract blue channel from ARGB color
    #[inline]
    pub fn blue(color: u32) -> u8 {
        (color & 0xFF) as u8
    }

    /// Extract alpha channel from ARGB color
    #[inline]
    pub fn alpha(color: u32) -> u8 {
        ((color >> 24) & 0xFF) as u8
    }

    /// Construct RGB color with full alpha
    #[inline]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> u32 {
        0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
    }

    /// Split an ARGB color into `[r, g, b, a]` byte order.
    #[inline]
    pub fn to_rgba(color: u32) -> [u8; 4] {
        [
            Self::red(color),
            Self::green(color),
            Self::blue(color),
            Self::alpha(color),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgr555_white_is_f8() {
        assert_eq!(ColorOps::from_bgr555(0x7FFF), 0xFFF8F8F8);
    }

    #[test]
    fn test_bgr555_channels() {
        // Pure red, green, blue at full 5-bit intensity
        assert_eq!(ColorOps::from_bgr555(0x001F), 0xFFF80000);
        assert_eq!(ColorOps::from_bgr555(0x03E0), 0xFF00F800);
        assert_eq!(ColorOps::from_bgr555(0x7C00), 0xFF0000F8);
        // Top bit is ignored
        assert_eq!(ColorOps::from_bgr555(0x8000), 0xFF000000);
    }

    #[test]
    fn test_color_component_extraction() {
        let color = 0xAABBCCDD;

        assert_eq!(ColorOps::alpha(color), 0xAA);
        assert_eq!(ColorOps::red(color), 0xBB);
        assert_eq!(ColorOps::green(color), 0xCC);
        assert_eq!(ColorOps::blue(color), 0xDD);
        assert_eq!(ColorOps::to_rgba(color), [0xBB, 0xCC, 0xDD, 0xAA]);
    }

    #[test]
    fn test_color_from_rgb() {
        let color = ColorOps::from_rgb(0xBB, 0xCC, 0xDD);
        assert_eq!(color, 0xFFBBCCDD);
    }
}
