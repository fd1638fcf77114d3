//! Bit-planar 8x8 tile decoding.
//!
//! SNES-style planar tiles store one bit of each pixel's color index per
//! plane. Planes come in interleaved pairs: for row `y`, plane 0 lives at
//! byte `2y`, plane 1 at `2y + 1`, plane 2 at `16 + 2y`, plane 3 at
//! `16 + 2y + 1`, and so on in 16-byte steps per plane pair.

/// Decoded tile: `pixels[y][x]` is a color index.
pub type Tile = [[u8; 8]; 8];

/// Bit depth and layout of a tile format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileFormat {
    /// 2 bits per pixel, 16 bytes per tile.
    Snes2Bpp,
    /// 4 bits per pixel, 32 bytes per tile.
    Snes4Bpp,
}

impl TileFormat {
    pub fn from_bits_per_pixel(bpp: u8) -> Option<Self> {
        match bpp {
            2 => Some(TileFormat::Snes2Bpp),
            4 => Some(TileFormat::Snes4Bpp),
            _ => None,
        }
    }

    pub fn bits_per_pixel(self) -> u8 {
        match self {
            TileFormat::Snes2Bpp => 2,
            TileFormat::Snes4Bpp => 4,
        }
    }

    /// Number of distinct color indices a pixel can take.
    pub fn colors(self) -> usize {
        1 << self.bits_per_pixel()
    }
}

/// Trait for decoding tile data into pixel indices.
pub trait TileDecoder {
    /// Color index of pixel `(x, y)`. Plane bytes past the end of
    /// `tile_data` read as 0.
    fn decode_pixel(&self, tile_data: &[u8], x: u8, y: u8) -> u8;

    /// Get the size of a single tile in bytes.
    fn tile_size(&self) -> usize;

    /// Decode a whole tile.
    fn decode_tile(&self, tile_data: &[u8]) -> Tile {
        let mut tile = [[0u8; 8]; 8];
        for (y, row) in tile.iter_mut().enumerate() {
            for (x, px) in row.iter_mut().enumerate() {
                *px = self.decode_pixel(tile_data, x as u8, y as u8);
            }
        }
        tile
    }
}

/// Interleaved-plane decoder for 2bpp and 4bpp tiles.
#[derive(Debug, Clone, Copy)]
pub struct PlanarDecoder {
    format: TileFormat,
}

impl PlanarDecoder {
    pub fn new(format: TileFormat) -> Self {
        Self { format }
    }

}

impl TileDecoder for PlanarDecoder {
    fn decode_pixel(&self, tile_data: &[u8], x: u8, y: u8) -> u8 {
        if x > 7 || y > 7 {
            return 0;
        }

        let shift = 7 - x;
        let mut index = 0u8;
        for plane in 0..self.format.bits_per_pixel() as usize {
            let at = y as usize * 2 + (plane / 2) * 16 + (plane & 1);
            let byte = tile_data.get(at).copied().unwrap_or(0);
            index |= ((byte >> shift) & 1) << plane;
        }
        index
    }

    fn tile_size(&self) -> usize {
        8 * self.format.bits_per_pixel() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_bpp() {
        assert_eq!(TileFormat::from_bits_per_pixel(2), Some(TileFormat::Snes2Bpp));
        assert_eq!(TileFormat::from_bits_per_pixel(4), Some(TileFormat::Snes4Bpp));
        assert_eq!(TileFormat::from_bits_per_pixel(8), None);
        assert_eq!(TileFormat::Snes4Bpp.colors(), 16);
    }

    #[test]
    fn test_tile_sizes() {
        assert_eq!(PlanarDecoder::new(TileFormat::Snes2Bpp).tile_size(), 16);
        assert_eq!(PlanarDecoder::new(TileFormat::Snes4Bpp).tile_size(), 32);
    }

    #[test]
    fn test_2bpp_interleaved_rows() {
        let mut tile_data = vec![0u8; 16];

        // Row 0: plane0=10101010, plane1=11111111 -> 3,2,3,2,...
        tile_data[0] = 0b10101010;
        tile_data[1] = 0b11111111;
        // Row 1: plane0=01010101, plane1=00000000 -> 0,1,0,1,...
        tile_data[2] = 0b01010101;
        tile_data[3] = 0b00000000;

        let decoder = PlanarDecoder::new(TileFormat::Snes2Bpp);

        assert_eq!(decoder.decode_pixel(&tile_data, 0, 0), 3);
        assert_eq!(decoder.decode_pixel(&tile_data, 1, 0), 2);
        assert_eq!(decoder.decode_pixel(&tile_data, 0, 1), 0);
        assert_eq!(decoder.decode_pixel(&tile_data, 1, 1), 1);
    }

    #[test]
    fn test_4bpp_upper_planes_at_offset_16() {
        let mut tile_data = vec![0u8; 32];

        // Row 2, leftmost pixel: planes 2 and 3 set
        tile_data[16 + 4] = 0b1000_0000;
        tile_data[16 + 5] = 0b1000_0000;
        // Row 2, rightmost pixel: plane 0 only
        tile_data[4] = 0b0000_0001;

        let decoder = PlanarDecoder::new(TileFormat::Snes4Bpp);
        assert_eq!(decoder.decode_pixel(&tile_data, 0, 2), 0b1100);
        assert_eq!(decoder.decode_pixel(&tile_data, 7, 2), 0b0001);
        assert_eq!(decoder.decode_pixel(&tile_data, 3, 2), 0);
    }

    #[test]
    fn test_short_or_out_of_bounds_reads_are_zero() {
        let decoder = PlanarDecoder::new(TileFormat::Snes4Bpp);
        // Planes 2 and 3 are cut off, planes 0 and 1 still count
        assert_eq!(decoder.decode_pixel(&[0xFF; 16], 0, 0), 0b0011);
        assert_eq!(decoder.decode_pixel(&[0xFF; 17], 0, 0), 0b0111);
        assert_eq!(decoder.decode_pixel(&[], 3, 3), 0);
        assert_eq!(decoder.decode_pixel(&[0xFF; 32], 8, 0), 0);
        assert_eq!(decoder.decode_pixel(&[0xFF; 32], 0, 8), 0);
    }

    #[test]
    fn test_decode_tile_layout() {
        let mut tile_data = vec![0u8; 16];
        tile_data[14] = 0b0000_0001; // row 7, plane 0, x = 7
        let tile = PlanarDecoder::new(TileFormat::Snes2Bpp).decode_tile(&tile_data);
        assert_eq!(tile[7][7], 1);
        assert_eq!(tile[7][6], 0);
        assert_eq!(tile[0][7], 0);
    }
}
