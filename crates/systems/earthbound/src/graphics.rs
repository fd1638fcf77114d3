//! Background tile sets and arrangements.

use crate::block::Block;
use crate::palette_cycle::PaletteCycle;
use crate::RomError;
use bbg_core::graphics::ColorOps;
use bbg_core::logging::{log, LogCategory, LogLevel};
use bbg_core::ppu::{IndexedPalette, PlanarDecoder, Tile, TileDecoder, TileFormat};
use bbg_core::types::Frame;

/// File offset of the graphics pointer table.
pub const GRAPHICS_POINTER_TABLE: usize = 0xD7A1;
/// File offset of the arrangement pointer table.
pub const ARRANGEMENT_POINTER_TABLE: usize = 0xD93D;

/// Arrangement grid size in cells (both axes).
pub const ARRANGEMENT_CELLS: usize = 32;
/// Layer bitmap size in pixels (both axes).
pub const LAYER_SIZE: u32 = (ARRANGEMENT_CELLS * 8) as u32;

/// One decoded arrangement word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrangementCell {
    pub tile: usize,
    pub subpalette: usize,
    pub hflip: bool,
    pub vflip: bool,
}

impl ArrangementCell {
    pub fn from_word(word: u16) -> Self {
        Self {
            tile: (word & 0x3FF) as usize,
            subpalette: ((word >> 10) & 7) as usize,
            hflip: word & 0x4000 != 0,
            vflip: word & 0x8000 != 0,
        }
    }
}

/// A decoded tile set.
#[derive(Debug, Clone)]
pub struct RomGraphics {
    format: TileFormat,
    tiles: Vec<Tile>,
}

impl RomGraphics {
    pub fn new(bits_per_pixel: u8) -> Result<Self, RomError> {
        let format = TileFormat::from_bits_per_pixel(bits_per_pixel)
            .ok_or(RomError::InvalidBitsPerPixel(bits_per_pixel))?;
        Ok(Self {
            format,
            tiles: Vec::new(),
        })
    }

    /// Rebuild the tile set from a decompressed graphics blob.
    ///
    /// A short trailing tile still counts; its missing bytes read as 0.
    pub fn load_graphics(&mut self, blob: &[u8]) {
        let decoder = PlanarDecoder::new(self.format);
        self.tiles = blob
            .chunks(decoder.tile_size())
            .map(|chunk| decoder.decode_tile(chunk))
            .collect();
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn bits_per_pixel(&self) -> u8 {
        self.format.bits_per_pixel()
    }

    /// Paint a 32x32 arrangement into `dst`.
    ///
    /// Only the RGB channels are written. Cells whose tile or arrangement
    /// word is missing are skipped, as are rows below the bottom of `dst`.
    pub fn draw(&self, dst: &mut Frame, palette: &dyn PaletteCycle, arrangement: &[u8]) {
        for cy in 0..ARRANGEMENT_CELLS {
            for cx in 0..ARRANGEMENT_CELLS {
                let index = (cy * ARRANGEMENT_CELLS + cx) * 2;
                let Some(word) = arrangement.get(index..index + 2) else {
                    log(LogCategory::Graphics, LogLevel::Trace, || {
                        format!("arrangement ends before cell ({}, {})", cx, cy)
                    });
                    return;
                };
                let cell = ArrangementCell::from_word(u16::from_le_bytes([word[0], word[1]]));
                self.draw_tile(dst, palette, cx * 8, cy * 8, cell);
            }
        }
    }

    fn draw_tile(
        &self,
        dst: &mut Frame,
        palette: &dyn PaletteCycle,
        x: usize,
        y: usize,
        cell: ArrangementCell,
    ) {
        let Some(tile) = self.tiles.get(cell.tile) else {
            log(LogCategory::Graphics, LogLevel::Trace, || {
                format!("tile {} missing ({} loaded)", cell.tile, self.tiles.len())
            });
            return;
        };
        let colors = palette.colors(cell.subpalette);
        let width = dst.width as usize;
        let height = dst.height as usize;

        for row in 0..8 {
            let py = y + row;
            if py >= height {
                break;
            }
            let ty = if cell.vflip { 7 - row } else { row };
            for col in 0..8 {
                let px = x + col;
                if px >= width {
                    break;
                }
                let tx = if cell.hflip { 7 - col } else { col };
                let [r, g, b, _] = ColorOps::to_rgba(colors.get_color(tile[ty][tx] as usize));
                let o = dst.offset(px, py);
                dst.pixels[o..o + 3].copy_from_slice(&[r, g, b]);
            }
        }
    }
}

/// Tile set plus arrangement for one graphics index.
#[derive(Debug, Clone)]
pub struct BackgroundGraphics {
    graphics: RomGraphics,
    arrangement: Vec<u8>,
}

impl BackgroundGraphics {
    /// Follow both pointer tables for `index` and decompress the blocks.
    pub fn load(data: &[u8], index: usize, bits_per_pixel: u8) -> Result<Self, RomError> {
        let mut graphics = RomGraphics::new(bits_per_pixel)?;

        let graphics_at = Block::new(data, GRAPHICS_POINTER_TABLE + index * 4).read_pointer()?;
        graphics.load_graphics(&Block::new(data, graphics_at).decompress()?);

        let arrangement_at =
            Block::new(data, ARRANGEMENT_POINTER_TABLE + index * 4).read_pointer()?;
        let arrangement = Block::new(data, arrangement_at).decompress()?;

        log(LogCategory::Graphics, LogLevel::Debug, || {
            format!(
                "graphics {}: {} tile(s) at {:#X}, arrangement {} byte(s) at {:#X}",
                index,
                graphics.tiles().len(),
                graphics_at,
                arrangement.len(),
                arrangement_at
            )
        });

        Ok(Self {
            graphics,
            arrangement,
        })
    }

    pub fn graphics(&self) -> &RomGraphics {
        &self.graphics
    }

    pub fn arrangement(&self) -> &[u8] {
        &self.arrangement
    }

    pub fn draw(&self, dst: &mut Frame, palette: &dyn PaletteCycle) {
        self.graphics.draw(dst, palette, &self.arrangement);
    }
}
