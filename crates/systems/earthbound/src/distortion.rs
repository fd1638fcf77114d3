//! Distortion effect records.
//!
//! Each record is 17 bytes:
//!
//! | bytes | field                     |
//! |-------|---------------------------|
//! | 0-1   | duration (not decoded)    |
//! | 2     | effect type               |
//! | 3-4   | frequency                 |
//! | 5-6   | amplitude                 |
//! | 7     | unused                    |
//! | 8-9   | compression               |
//! | 10-11 | frequency acceleration    |
//! | 12-13 | amplitude acceleration    |
//! | 14    | speed (signed byte)       |
//! | 15-16 | compression acceleration  |
//!
//! Multi-byte fields are signed little-endian.

use crate::block::Block;
use crate::{RomError, DISTORTION_COUNT};
use serde::{Deserialize, Serialize};

/// File offset of the first distortion record.
pub const DISTORTION_TABLE: usize = 0xF708;
/// Size of one distortion record in bytes.
pub const RECORD_SIZE: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    Horizontal = 1,
    HorizontalInterlaced = 2,
    Vertical = 3,
}

impl EffectType {
    /// Classify a raw type byte. Unknown values are treated as interlaced.
    pub fn sanitize(raw: u8) -> Self {
        match raw {
            1 => EffectType::Horizontal,
            3 => EffectType::Vertical,
            _ => EffectType::HorizontalInterlaced,
        }
    }

    pub fn is_horizontal(self) -> bool {
        !matches!(self, EffectType::Vertical)
    }
}

/// Decoded distortion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistortionEffect {
    pub effect_type: EffectType,
    pub frequency: i16,
    pub amplitude: i16,
    pub compression: i16,
    pub frequency_acceleration: i16,
    pub amplitude_acceleration: i16,
    pub compression_acceleration: i16,
    pub speed: i8,
}

impl Default for DistortionEffect {
    fn default() -> Self {
        Self {
            effect_type: EffectType::HorizontalInterlaced,
            frequency: 0,
            amplitude: 0,
            compression: 0,
            frequency_acceleration: 0,
            amplitude_acceleration: 0,
            compression_acceleration: 0,
            speed: 0,
        }
    }
}

impl DistortionEffect {
    pub fn from_bytes(record: &[u8; RECORD_SIZE]) -> Self {
        let word = |i: usize| i16::from_le_bytes([record[i], record[i + 1]]);
        Self {
            effect_type: EffectType::sanitize(record[2]),
            frequency: word(3),
            amplitude: word(5),
            compression: word(8),
            frequency_acceleration: word(10),
            amplitude_acceleration: word(12),
            speed: record[14] as i8,
            compression_acceleration: word(15),
        }
    }

    /// Read record `index` from the distortion table.
    pub fn load(data: &[u8], index: usize) -> Result<Self, RomError> {
        if index >= DISTORTION_COUNT {
            return Err(RomError::IndexOutOfRange {
                table: "distortion",
                index,
                limit: DISTORTION_COUNT,
            });
        }
        let record =
            Block::new(data, DISTORTION_TABLE + index * RECORD_SIZE).read_array::<RECORD_SIZE>()?;
        Ok(Self::from_bytes(&record))
    }
}
