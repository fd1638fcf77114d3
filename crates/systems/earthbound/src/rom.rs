//! The background catalog.
//!
//! [`Rom::new`] reads every background entry once, checks that each graphics
//! set and palette is always used with the same bit depth, and decodes all
//! referenced palettes. Graphics sets are decompressed when a layer asks
//! for them.

use crate::block::Block;
use crate::codec;
use crate::distortion::DistortionEffect;
use crate::graphics::BackgroundGraphics;
use crate::palette::BackgroundPalette;
use crate::{DecodeError, RomError, GRAPHICS_COUNT, MAX_LAYER_INDEX, PALETTE_COUNT};
use bbg_core::logging::{log, LogCategory, LogLevel};
use serde::{Deserialize, Serialize};

/// File offset of the first background entry.
pub const BACKGROUND_TABLE: usize = 0xDCA1;
/// Size of one background entry in bytes.
pub const ENTRY_SIZE: usize = 17;

/// One row of the background table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundEntry {
    pub graphics_index: u8,
    pub palette_index: u8,
    pub bits_per_pixel: u8,
    pub palette_cycle_type: u8,
    pub cycle1_start: u8,
    pub cycle1_end: u8,
    pub cycle2_start: u8,
    pub cycle2_end: u8,
    pub cycle_speed: u8,
    pub horizontal_movement: i8,
    pub vertical_movement: i8,
    pub horizontal_acceleration: i8,
    pub vertical_acceleration: i8,
    /// Packed effect indices, most significant byte first.
    pub animation: u32,
}

impl BackgroundEntry {
    pub fn from_bytes(b: &[u8; ENTRY_SIZE]) -> Self {
        Self {
            graphics_index: b[0],
            palette_index: b[1],
            bits_per_pixel: b[2],
            palette_cycle_type: b[3],
            cycle1_start: b[4],
            cycle1_end: b[5],
            cycle2_start: b[6],
            cycle2_end: b[7],
            cycle_speed: b[8],
            horizontal_movement: b[9] as i8,
            vertical_movement: b[10] as i8,
            horizontal_acceleration: b[11] as i8,
            vertical_acceleration: b[12] as i8,
            animation: u32::from_be_bytes([b[13], b[14], b[15], b[16]]),
        }
    }

    pub fn read(data: &[u8], index: usize) -> Result<Self, RomError> {
        let bytes =
            Block::new(data, BACKGROUND_TABLE + index * ENTRY_SIZE).read_array::<ENTRY_SIZE>()?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Distortion effect index: the second effect byte if set, else the first.
    pub fn effect_index(&self) -> usize {
        let first = (self.animation >> 24) & 0xFF;
        let second = (self.animation >> 16) & 0xFF;
        if second != 0 {
            second as usize
        } else {
            first as usize
        }
    }
}

/// Records the single bit depth each table slot is used with.
fn record_depth(
    bits: &mut [u8],
    table: &'static str,
    index: usize,
    depth: u8,
) -> Result<(), RomError> {
    let limit = bits.len();
    let slot = bits
        .get_mut(index)
        .ok_or(RomError::IndexOutOfRange { table, index, limit })?;
    if *slot != 0 && *slot != depth {
        log(LogCategory::Rom, LogLevel::Error, || {
            format!("{} {} used with {} and {} bpp", table, index, slot, depth)
        });
        return Err(RomError::InconsistentBitDepth {
            table,
            index,
            first: *slot,
            second: depth,
        });
    }
    *slot = depth;
    Ok(())
}

/// Loaded catalog of background entries and palettes over a ROM image.
pub struct Rom {
    data: Vec<u8>,
    entries: Vec<BackgroundEntry>,
    palettes: Vec<Option<BackgroundPalette>>,
    graphics_bits: Vec<u8>,
}

impl Rom {
    pub fn new(data: Vec<u8>) -> Result<Self, RomError> {
        let mut entries = Vec::with_capacity(MAX_LAYER_INDEX + 1);
        let mut palette_bits = vec![0u8; PALETTE_COUNT];
        let mut graphics_bits = vec![0u8; GRAPHICS_COUNT];

        for index in 0..=MAX_LAYER_INDEX {
            let entry = BackgroundEntry::read(&data, index)?;
            let depth = entry.bits_per_pixel;
            record_depth(&mut palette_bits, "palette", entry.palette_index as usize, depth)?;
            record_depth(&mut graphics_bits, "graphics", entry.graphics_index as usize, depth)?;
            entries.push(entry);
        }

        let palettes = palette_bits
            .iter()
            .enumerate()
            .map(|(index, &bits)| {
                if bits == 0 {
                    log(LogCategory::Rom, LogLevel::Debug, || {
                        format!("palette {} is not referenced", index)
                    });
                    return Ok(None);
                }
                BackgroundPalette::load(&data, index, bits).map(Some)
            })
            .collect::<Result<Vec<_>, _>>()?;

        log(LogCategory::Rom, LogLevel::Info, || {
            format!(
                "catalog loaded: {} entries, {} palettes, {} graphics sets ({} bytes)",
                entries.len(),
                palettes.iter().flatten().count(),
                graphics_bits.iter().filter(|&&b| b != 0).count(),
                data.len()
            )
        });

        Ok(Self {
            data,
            entries,
            palettes,
            graphics_bits,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn block(&self, offset: usize) -> Block<'_> {
        Block::new(&self.data, offset)
    }

    pub fn entries(&self) -> &[BackgroundEntry] {
        &self.entries
    }

    pub fn background(&self, index: usize) -> Result<&BackgroundEntry, RomError> {
        self.entries.get(index).ok_or(RomError::IndexOutOfRange {
            table: "background",
            index,
            limit: self.entries.len(),
        })
    }

    /// A decoded palette. Palettes no entry references are not decoded and
    /// report as out of range.
    pub fn palette(&self, index: usize) -> Result<&BackgroundPalette, RomError> {
        self.palettes
            .get(index)
            .and_then(Option::as_ref)
            .ok_or(RomError::IndexOutOfRange {
                table: "palette",
                index,
                limit: PALETTE_COUNT,
            })
    }

    /// Bit depth a graphics set is used with, 0 if unreferenced.
    pub fn graphics_bits(&self, index: usize) -> u8 {
        self.graphics_bits.get(index).copied().unwrap_or(0)
    }

    /// Decompress graphics set `index` at its recorded bit depth.
    pub fn graphics(&self, index: usize) -> Result<BackgroundGraphics, RomError> {
        let bits = self.graphics_bits(index);
        if bits == 0 {
            return Err(RomError::IndexOutOfRange {
                table: "graphics",
                index,
                limit: GRAPHICS_COUNT,
            });
        }
        BackgroundGraphics::load(&self.data, index, bits)
    }

    pub fn distortion_effect(&self, index: usize) -> Result<DistortionEffect, RomError> {
        DistortionEffect::load(&self.data, index)
    }

    /// Decompressed size of the block at `offset`.
    pub fn measure(&self, offset: usize) -> Result<usize, DecodeError> {
        codec::measure(&self.data, offset)
    }

    pub fn decompress(&self, offset: usize) -> Result<Vec<u8>, DecodeError> {
        self.block(offset).decompress()
    }
}
