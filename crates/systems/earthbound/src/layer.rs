//! One animated background layer.

use crate::distorter::Distorter;
use crate::distortion::DistortionEffect;
use crate::graphics::{BackgroundGraphics, LAYER_SIZE};
use crate::palette_cycle::{CycleParams, PaletteCycle, StaticCycle};
use crate::rom::Rom;
use crate::{RomError, DISTORTION_COUNT, SNES_HEIGHT, SNES_WIDTH};
use bbg_core::logging::{log, LogCategory, LogLevel};
use bbg_core::types::Frame;
use serde_json::Value;

/// Graphics, palette animation and distortion for one background entry.
///
/// The layer keeps its own 256x256 bitmap, redrawn from the tile set each
/// frame and then distorted into the caller's frame.
pub struct BackgroundLayer {
    entry: usize,
    graphics: BackgroundGraphics,
    cycle: Box<dyn PaletteCycle>,
    distorter: Distorter,
    bitmap: Frame,
}

impl BackgroundLayer {
    pub fn new(rom: &Rom, entry: usize) -> Result<Self, RomError> {
        let background = *rom.background(entry)?;
        let graphics = rom.graphics(background.graphics_index as usize)?;
        let palette = rom.palette(background.palette_index as usize)?.clone();
        let cycle = StaticCycle::new(palette, CycleParams::from(&background));

        let effect_index = background.effect_index();
        let effect = if effect_index < DISTORTION_COUNT {
            rom.distortion_effect(effect_index)?
        } else {
            log(LogCategory::Distortion, LogLevel::Warn, || {
                format!(
                    "entry {}: effect {} out of range, using no distortion",
                    entry, effect_index
                )
            });
            DistortionEffect::default()
        };

        log(LogCategory::Scene, LogLevel::Debug, || {
            format!(
                "layer {}: graphics {}, palette {}, {} bpp, effect {} ({:?})",
                entry,
                background.graphics_index,
                background.palette_index,
                background.bits_per_pixel,
                effect_index,
                effect.effect_type
            )
        });

        Ok(Self {
            entry,
            graphics,
            cycle: Box::new(cycle),
            distorter: Distorter::new(effect),
            bitmap: Frame::new(LAYER_SIZE, LAYER_SIZE),
        })
    }

    /// Replace the palette animation strategy.
    pub fn with_cycle(mut self, cycle: Box<dyn PaletteCycle>) -> Self {
        self.cycle = cycle;
        self
    }

    pub fn effect(&self) -> &DistortionEffect {
        self.distorter.effect()
    }

    pub fn debug_state(&self) -> Value {
        let graphics = self.graphics.graphics();
        serde_json::json!({
            "entry": self.entry,
            "effect": self.effect(),
            "bits_per_pixel": graphics.bits_per_pixel(),
            "tiles": graphics.tiles().len(),
            "arrangement_bytes": self.graphics.arrangement().len(),
            "bitmap": [self.bitmap.width, self.bitmap.height],
            "palette": self.cycle.debug_state(),
        })
    }

    /// Advance the palette, redraw the bitmap and composite it into `dst`.
    pub fn overlay_frame(
        &mut self,
        dst: &mut Frame,
        letterbox: u32,
        tick: u64,
        alpha: f64,
        erase: bool,
    ) {
        self.cycle.cycle();
        self.graphics.draw(&mut self.bitmap, self.cycle.as_ref());
        self.distorter
            .overlay_frame(&self.bitmap, dst, letterbox, tick, alpha, erase);
    }

    /// Render this layer alone into a fresh frame.
    pub fn render(&mut self, tick: u64) -> Frame {
        let mut frame = Frame::new(SNES_WIDTH, SNES_HEIGHT);
        self.overlay_frame(&mut frame, 0, tick, 1.0, true);
        frame
    }
}
