//! Battle background extraction and rendering for EarthBound cartridge data.
//!
//! The pipeline turns raw cartridge bytes into animated RGBA8 frames:
//!
//! - **address**: logical (bus) address <-> file offset translation
//! - **block**: little-endian read cursor that can decompress in place
//! - **codec**: the cartridge's run-length/back-reference compression format
//! - **graphics**: bit-planar tile sets and 32x32 tile arrangements
//! - **palette**: BGR555 subpalette tables
//! - **palette_cycle**: per-frame palette animation strategies
//! - **distortion**: 17-byte distortion effect records
//! - **distorter**: per-scanline sinusoidal offset and additive compositing
//! - **layer**: one animated background layer
//! - **rom**: the catalog of pointer tables, loaded once
//! - **scene**: up to two layers blended into one output frame

pub mod address;
pub mod block;
pub mod codec;
pub mod distorter;
pub mod distortion;
pub mod graphics;
pub mod layer;
pub mod palette;
pub mod palette_cycle;
pub mod rom;
pub mod scene;

pub use distorter::Distorter;
pub use distortion::{DistortionEffect, EffectType};
pub use layer::BackgroundLayer;
pub use rom::{BackgroundEntry, Rom};
pub use scene::{AspectRatio, BattleScene, SceneConfig};

use thiserror::Error;

/// Highest valid background entry index.
pub const MAX_LAYER_INDEX: usize = 326;
/// Number of graphics sets (tiles + arrangement) in the catalog.
pub const GRAPHICS_COUNT: usize = 103;
/// Number of background palettes in the catalog.
pub const PALETTE_COUNT: usize = 114;
/// Number of distortion effect records.
pub const DISTORTION_COUNT: usize = 135;

/// Visible output width in pixels.
pub const SNES_WIDTH: u32 = 256;
/// Visible output height in pixels.
pub const SNES_HEIGHT: u32 = 224;

/// Failures inside a compressed block.
///
/// Decoding never returns partial output: a block either expands fully or
/// reports exactly one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("compressed stream ended before the 0xFF terminator (at {0:#X})")]
    UnexpectedEnd(usize),
    #[error("running output length overflowed")]
    LengthOverflow,
    #[error("command writes {length} byte(s) at {position}, past the {capacity}-byte output")]
    OutputOverflow {
        position: usize,
        length: usize,
        capacity: usize,
    },
    #[error("back-reference source {source_pos} (+{length}) outside the {capacity}-byte output")]
    SourceOutOfRange {
        source_pos: usize,
        length: usize,
        capacity: usize,
    },
    #[error("reversed copy of {length} byte(s) from {source_pos} runs below the output start")]
    ReversedSourceUnderflow { source_pos: usize, length: usize },
    #[error("unknown compression command {command} in byte {byte:#04X}")]
    UnknownCommand { command: u8, byte: u8 },
    #[error("decompressed {actual} byte(s), expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("compressed block at {0:#X} is empty")]
    EmptyBlock(usize),
}

/// Load-time failures. These abort catalog or layer construction.
#[derive(Error, Debug)]
pub enum RomError {
    #[error("logical address out of range: {0:#08X}")]
    AddressOutOfRange(u32),
    #[error("file offset out of range: {0:#X}")]
    FileOffsetOutOfRange(usize),
    #[error("read past end of ROM at {offset:#X} ({len} bytes)")]
    UnexpectedEof { offset: usize, len: usize },
    #[error("inconsistent bit depth for {table} {index}: {first} vs {second}")]
    InconsistentBitDepth {
        table: &'static str,
        index: usize,
        first: u8,
        second: u8,
    },
    #[error("invalid bits per pixel: {0} (expected 2 or 4)")]
    InvalidBitsPerPixel(u8),
    #[error("subpalette count must be positive, got {0}")]
    InvalidSubpaletteCount(usize),
    #[error("{table} index {index} out of range (limit {limit})")]
    IndexOutOfRange {
        table: &'static str,
        index: usize,
        limit: usize,
    },
    #[error("decompression failed: {0}")]
    Decode(#[from] DecodeError),
}
