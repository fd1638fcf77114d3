//! Synthetic ROM images for integration tests.
//!
//! Every pointer table sits at its real file offset. Asset data is appended
//! after the last table, and pointers use the upper bank so that logical
//! address `$CA:0000 + n` lands on file offset `n`.

#![allow(dead_code)]

use bbg_earthbound::distortion::{DISTORTION_TABLE, RECORD_SIZE};
use bbg_earthbound::graphics::{
    ARRANGEMENT_CELLS, ARRANGEMENT_POINTER_TABLE, GRAPHICS_POINTER_TABLE,
};
use bbg_earthbound::palette::PALETTE_POINTER_TABLE;
use bbg_earthbound::rom::{BACKGROUND_TABLE, ENTRY_SIZE};
use bbg_earthbound::MAX_LAYER_INDEX;

const DATA_START: usize = 0x10000;
const LOGICAL_BASE: u32 = 0xCA_0000;

/// black, red, green, white
pub const PALETTE: [u16; 4] = [0x0000, 0x001F, 0x03E0, 0x7FFF];

/// Compress `bytes` as a run of raw commands.
pub fn encode_raw(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in bytes.chunks(32) {
        out.push((chunk.len() - 1) as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0xFF);
    out
}

/// Compress `count` copies of `byte` with extended byte runs.
pub fn encode_fill(byte: u8, count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut left = count;
    while left > 0 {
        let n = left.min(1024);
        let field = n - 1;
        out.push(0xE0 | (1 << 2) | (field >> 8) as u8);
        out.push(field as u8);
        out.push(byte);
        left -= n;
    }
    out.push(0xFF);
    out
}

/// 2bpp tile: column 0 is color 1, the top-right pixel color 2.
pub fn marker_tile() -> Vec<u8> {
    let mut tile = vec![0u8; 16];
    for y in 0..8 {
        tile[y * 2] = 0b1000_0000;
    }
    tile[1] = 0b0000_0001;
    tile
}

pub fn entry_bytes(graphics: u8, palette: u8, bpp: u8, animation: u32) -> [u8; ENTRY_SIZE] {
    let mut bytes = [0u8; ENTRY_SIZE];
    bytes[0] = graphics;
    bytes[1] = palette;
    bytes[2] = bpp;
    bytes[13..17].copy_from_slice(&animation.to_be_bytes());
    bytes
}

/// A constant horizontal wave of height 3 once `tick * speed` reaches 30.
pub fn shifting_effect(kind: u8) -> [u8; RECORD_SIZE] {
    let mut record = [0u8; RECORD_SIZE];
    record[2] = kind;
    record[5..7].copy_from_slice(&(3i16 * 512).to_le_bytes());
    record[14] = 30;
    record
}

pub struct RomBuilder {
    data: Vec<u8>,
}

impl RomBuilder {
    /// Every entry uses graphics 0 and palette 0 at 2bpp. Graphics 0 is the
    /// marker tile repeated over the whole arrangement.
    pub fn new() -> Self {
        let mut builder = Self {
            data: vec![0; DATA_START],
        };
        for i in 0..=MAX_LAYER_INDEX {
            builder.set_entry(i, entry_bytes(0, 0, 2, 0));
        }
        builder.set_palette(0, &PALETTE);
        builder.set_graphics(
            0,
            &encode_raw(&marker_tile()),
            &encode_fill(0, ARRANGEMENT_CELLS * ARRANGEMENT_CELLS * 2),
        );
        builder
    }

    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let at = self.data.len();
        self.data.extend_from_slice(bytes);
        at
    }

    pub fn set_pointer(&mut self, table: usize, index: usize, offset: usize) {
        self.set_raw_pointer(table, index, LOGICAL_BASE + offset as u32);
    }

    pub fn set_raw_pointer(&mut self, table: usize, index: usize, address: u32) {
        let at = table + index * 4;
        self.data[at..at + 4].copy_from_slice(&address.to_le_bytes());
    }

    pub fn set_entry(&mut self, index: usize, bytes: [u8; ENTRY_SIZE]) {
        let at = BACKGROUND_TABLE + index * ENTRY_SIZE;
        self.data[at..at + ENTRY_SIZE].copy_from_slice(&bytes);
    }

    pub fn set_palette(&mut self, index: usize, colors: &[u16]) {
        let bytes: Vec<u8> = colors.iter().flat_map(|c| c.to_le_bytes()).collect();
        let at = self.append(&bytes);
        self.set_pointer(PALETTE_POINTER_TABLE, index, at);
    }

    /// Store already-compressed tile and arrangement blocks; returns the
    /// tile block's offset.
    pub fn set_graphics(&mut self, index: usize, tiles: &[u8], arrangement: &[u8]) -> usize {
        let tiles_at = self.append(tiles);
        let arrangement_at = self.append(arrangement);
        self.set_pointer(GRAPHICS_POINTER_TABLE, index, tiles_at);
        self.set_pointer(ARRANGEMENT_POINTER_TABLE, index, arrangement_at);
        tiles_at
    }

    pub fn set_distortion(&mut self, index: usize, record: [u8; RECORD_SIZE]) {
        let at = DISTORTION_TABLE + index * RECORD_SIZE;
        self.data[at..at + RECORD_SIZE].copy_from_slice(&record);
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}
