//! Per-scanline distortion and compositing.
//!
//! For every destination line the effect yields a sine-driven offset whose
//! amplitude, frequency and compression drift with time:
//!
//! ```text
//! t2   = tick * 2
//! amp  = (amplitude + amplitude_acceleration * t2) / 512
//! comp = 1 + (compression + compression_acceleration * t2) / 256
//! freq = 8pi / (1024 * 256) * (frequency + frequency_acceleration * t2)
//! spd  = pi / 60 * speed * tick
//! s(y) = round(amp * sin(freq * y + spd))
//! ```
//!
//! Horizontal effects shift the sampled source column by `s(y)` (negated on
//! even lines when interlaced). Vertical effects replace the source row with
//! `floor(s(y) + y * comp) mod 256`.
//!
//! Blending adds `alpha * src` into the destination channel and wraps at
//! 256 instead of clamping, so layers drawn without `erase` accumulate.

use crate::distortion::{DistortionEffect, EffectType};
use bbg_core::types::Frame;
use std::f64::consts::PI;

const C1: f64 = 1.0 / 512.0;
const C2: f64 = 8.0 * PI / (1024.0 * 256.0);
const C3: f64 = PI / 60.0;

/// Source rows available to vertical effects.
const VERTICAL_ROWS: i64 = 256;

/// Modulo with the sign of the divisor: always in `[0, m)` for `m > 0`.
#[inline]
pub fn floormod(n: i64, m: i64) -> i64 {
    n.rem_euclid(m)
}

/// Store `value` into a byte the way a typed-array write does: truncate
/// toward zero, then wrap modulo 256. Non-finite values become 0.
#[inline]
fn to_u8_wrapping(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value.trunc() as i64).rem_euclid(256) as u8
}

/// Round half up, matching the usual screen-space rounding.
#[inline]
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Effect parameters evaluated at one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedParams {
    pub effect_type: EffectType,
    pub amplitude: f64,
    pub compression: f64,
    pub frequency: f64,
    pub speed: f64,
}

impl AnimatedParams {
    pub fn at(effect: &DistortionEffect, tick: u64) -> Self {
        let ticks = tick as f64;
        let t2 = ticks * 2.0;
        Self {
            effect_type: effect.effect_type,
            amplitude: C1 * (effect.amplitude as f64 + effect.amplitude_acceleration as f64 * t2),
            compression: 1.0
                + (effect.compression as f64 + effect.compression_acceleration as f64 * t2) / 256.0,
            frequency: C2 * (effect.frequency as f64 + effect.frequency_acceleration as f64 * t2),
            speed: C3 * effect.speed as f64 * ticks,
        }
    }

    /// The raw wave value `s(y)`.
    pub fn wave(&self, y: u32) -> f64 {
        round_half_up(self.amplitude * (self.frequency * y as f64 + self.speed).sin())
    }

    /// Horizontal shift, or source row for vertical effects.
    pub fn offset(&self, y: u32) -> i64 {
        let s = self.wave(y);
        match self.effect_type {
            EffectType::Horizontal => s as i64,
            EffectType::HorizontalInterlaced => {
                if y % 2 == 0 {
                    -(s as i64)
                } else {
                    s as i64
                }
            }
            EffectType::Vertical => {
                floormod((s + y as f64 * self.compression).floor() as i64, VERTICAL_ROWS)
            }
        }
    }
}

/// Applies one distortion effect to a layer bitmap.
#[derive(Debug, Clone)]
pub struct Distorter {
    effect: DistortionEffect,
}

impl Distorter {
    pub fn new(effect: DistortionEffect) -> Self {
        Self { effect }
    }

    pub fn effect(&self) -> &DistortionEffect {
        &self.effect
    }

    /// Composite `src` into `dst` at `tick`.
    ///
    /// Rows in the top and bottom `letterbox` bands are painted opaque black.
    /// With `erase` the destination RGB is cleared before blending. Alpha is
    /// always left at 255.
    pub fn overlay_frame(
        &self,
        src: &Frame,
        dst: &mut Frame,
        letterbox: u32,
        tick: u64,
        alpha: f64,
        erase: bool,
    ) {
        let params = AnimatedParams::at(&self.effect, tick);
        let width = dst.width as i64;
        let height = dst.height as i64;
        let stride = dst.stride();
        let lb = letterbox as i64;

        for y in 0..dst.height {
            let row = y as usize * stride;
            let line = &mut dst.pixels[row..row + stride];

            if (y as i64) < lb || y as i64 > height - lb {
                for px in line.chunks_exact_mut(4) {
                    px.copy_from_slice(&[0, 0, 0, 255]);
                }
                continue;
            }

            let offset = params.offset(y);
            let (source_row, shift) = if params.effect_type.is_horizontal() {
                (y as usize, offset)
            } else {
                (offset as usize, 0)
            };

            for (x, px) in line.chunks_exact_mut(4).enumerate() {
                let source_x = floormod(x as i64 + shift, width) as usize;
                let source = source_pixel(src, source_x, source_row);
                for c in 0..3 {
                    if erase {
                        px[c] = 0;
                    }
                    px[c] = to_u8_wrapping(px[c] as f64 + alpha * source[c] as f64);
                }
                px[3] = 255;
            }
        }
    }
}

/// Missing source pixels read as black.
fn source_pixel(src: &Frame, x: usize, y: usize) -> [u8; 4] {
    if x >= src.width as usize || y >= src.height as usize {
        return [0; 4];
    }
    src.rgba(x, y)
}
