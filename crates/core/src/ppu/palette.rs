//! Indexed palette storage.
//!
//! Pixels carry a small color index; a palette maps that index to a packed
//! ARGB8888 color. A resource with several selectable tables stores one
//! [`RamPalette`] per subpalette.

/// Color returned for an index the palette does not cover.
pub const MISSING_COLOR: u32 = 0xFF000000;

/// Lookup from a color index to `0xAARRGGBB`.
pub trait IndexedPalette {
    /// Color for `index`, or [`MISSING_COLOR`] past the end.
    fn get_color(&self, index: usize) -> u32;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IndexedPalette for [u32] {
    fn get_color(&self, index: usize) -> u32 {
        self.get(index).copied().unwrap_or(MISSING_COLOR)
    }

    fn len(&self) -> usize {
        <[u32]>::len(self)
    }
}

/// One decoded color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamPalette {
    colors: Vec<u32>,
}

impl RamPalette {
    pub fn from_colors(colors: Vec<u32>) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &[u32] {
        &self.colors
    }
}
