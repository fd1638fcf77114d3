//! Per-frame palette animation.
//!
//! A layer asks its cycle for the current colors of a subpalette every time
//! it redraws. [`PaletteCycle::cycle`] is called once per rendered frame,
//! before drawing.

use crate::palette::BackgroundPalette;
use crate::rom::BackgroundEntry;
use bbg_core::logging::{log, LogCategory, LogLevel};
use serde::Serialize;
use serde_json::Value;

/// Stateful color animator consumed by the tile renderer.
pub trait PaletteCycle {
    /// Advance the animation by one frame.
    fn cycle(&mut self);

    /// Current colors of `subpalette`, as `0xAARRGGBB`.
    fn colors(&self, subpalette: usize) -> &[u32];

    fn debug_state(&self) -> Value {
        Value::Null
    }
}

/// Cycle parameters carried by a background entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleParams {
    pub kind: u8,
    pub cycle1: (u8, u8),
    pub cycle2: (u8, u8),
    pub speed: u8,
}

impl From<&BackgroundEntry> for CycleParams {
    fn from(entry: &BackgroundEntry) -> Self {
        Self {
            kind: entry.palette_cycle_type,
            cycle1: (entry.cycle1_start, entry.cycle1_end),
            cycle2: (entry.cycle2_start, entry.cycle2_end),
            speed: entry.cycle_speed,
        }
    }
}

/// Shows the palette as decoded and only counts frames.
///
/// Requests for a subpalette the palette does not have fall back to
/// subpalette 0.
#[derive(Debug, Clone)]
pub struct StaticCycle {
    palette: BackgroundPalette,
    params: CycleParams,
    ticks: u64,
}

impl StaticCycle {
    pub fn new(palette: BackgroundPalette, params: CycleParams) -> Self {
        Self {
            palette,
            params,
            ticks: 0,
        }
    }
}

impl PaletteCycle for StaticCycle {
    fn cycle(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    fn colors(&self, subpalette: usize) -> &[u32] {
        if let Some(colors) = self.palette.colors(subpalette) {
            return colors;
        }
        log(LogCategory::Graphics, LogLevel::Trace, || {
            format!(
                "subpalette {} missing at {:#X} ({} decoded), using 0",
                subpalette,
                self.palette.address(),
                self.palette.subpalettes().len()
            )
        });
        self.palette.colors(0).unwrap_or(&[])
    }

    fn debug_state(&self) -> Value {
        serde_json::json!({
            "ticks": self.ticks,
            "params": self.params,
            "address": self.palette.address(),
            "bits_per_pixel": self.palette.bits_per_pixel(),
            "subpalettes": self.palette.subpalettes().len(),
        })
    }
}
