//! Tile and palette building blocks for console background graphics.

pub mod palette;
pub mod tile;

pub use palette::{IndexedPalette, RamPalette, MISSING_COLOR};
pub use tile::{PlanarDecoder, Tile, TileDecoder, TileFormat};
