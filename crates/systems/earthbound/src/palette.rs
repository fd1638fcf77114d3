//! Background palettes.
//!
//! A palette resource is a run of BGR555 words: `count` subpalettes of
//! `2^bpp` colors each. Colors are expanded to opaque ARGB8888 with each
//! channel scaled by 8.

use crate::block::Block;
use crate::RomError;
use bbg_core::graphics::ColorOps;
use bbg_core::ppu::{RamPalette, TileFormat};

/// File offset of the palette pointer table (4-byte logical pointers).
pub const PALETTE_POINTER_TABLE: usize = 0xDAD9;

/// Decode `count` subpalettes at the cursor.
pub fn read_subpalettes(
    block: &mut Block<'_>,
    bits_per_pixel: u8,
    count: usize,
) -> Result<Vec<RamPalette>, RomError> {
    let format = TileFormat::from_bits_per_pixel(bits_per_pixel)
        .ok_or(RomError::InvalidBitsPerPixel(bits_per_pixel))?;
    if count < 1 {
        return Err(RomError::InvalidSubpaletteCount(count));
    }

    (0..count)
        .map(|_| {
            let colors = (0..format.colors())
                .map(|_| block.read_u16().map(ColorOps::from_bgr555))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RamPalette::from_colors(colors))
        })
        .collect()
}

/// One decoded palette resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundPalette {
    bits_per_pixel: u8,
    address: usize,
    subpalettes: Vec<RamPalette>,
}

impl BackgroundPalette {
    /// Follow entry `index` of the palette pointer table and decode one
    /// subpalette.
    pub fn load(data: &[u8], index: usize, bits_per_pixel: u8) -> Result<Self, RomError> {
        let address = Block::new(data, PALETTE_POINTER_TABLE + index * 4).read_pointer()?;
        Self::read(data, address, bits_per_pixel, 1)
    }

    /// Decode `count` subpalettes stored at file offset `address`.
    pub fn read(
        data: &[u8],
        address: usize,
        bits_per_pixel: u8,
        count: usize,
    ) -> Result<Self, RomError> {
        let subpalettes = read_subpalettes(&mut Block::new(data, address), bits_per_pixel, count)?;
        Ok(Self {
            bits_per_pixel,
            address,
            subpalettes,
        })
    }

    pub fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    /// File offset the colors were read from.
    pub fn address(&self) -> usize {
        self.address
    }

    /// Colors of one subpalette, or `None` if it does not exist.
    pub fn colors(&self, subpalette: usize) -> Option<&[u32]> {
        self.subpalettes.get(subpalette).map(|p| p.colors())
    }

    pub fn subpalettes(&self) -> &[RamPalette] {
        &self.subpalettes
    }
}
