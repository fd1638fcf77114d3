//! Two-layer battle scene.

use crate::layer::BackgroundLayer;
use crate::rom::Rom;
use crate::{RomError, MAX_LAYER_INDEX, SNES_HEIGHT, SNES_WIDTH};
use bbg_core::logging::{log, LogCategory, LogLevel};
use bbg_core::types::Frame;
use bbg_core::FrameSource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LAYER1: usize = 219;
pub const DEFAULT_LAYER2: usize = 218;
pub const MAX_FRAME_SKIP: u32 = 10;

/// Letterbox presets. The discriminant is the band height in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    /// 8:7
    #[default]
    Full = 0,
    /// 4:3
    Wide = 16,
    /// 2:1
    Medium = 48,
    /// 8:3
    Narrow = 64,
}

impl AspectRatio {
    pub fn letterbox(self) -> u32 {
        self as u32
    }
}

/// Which backgrounds to show and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub layer1: usize,
    pub layer2: usize,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default = "default_frame_skip")]
    pub frame_skip: u32,
    /// Per-layer blend weights; derived from the layer count when absent.
    #[serde(default)]
    pub alpha: Option<[f64; 2]>,
}

fn default_frame_skip() -> u32 {
    1
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            layer1: DEFAULT_LAYER1,
            layer2: DEFAULT_LAYER2,
            aspect_ratio: AspectRatio::Full,
            frame_skip: default_frame_skip(),
            alpha: None,
        }
    }
}

impl SceneConfig {
    /// Clamp user input to something renderable.
    ///
    /// Out-of-range layers become 0 (off). If both layers end up off the
    /// default pair is used. Frame skip must be in `1..=10`.
    pub fn sanitize(mut self) -> Self {
        if self.layer1 > MAX_LAYER_INDEX {
            self.layer1 = 0;
        }
        if self.layer2 > MAX_LAYER_INDEX {
            self.layer2 = 0;
        }
        if self.layer1 == 0 && self.layer2 == 0 {
            self.layer1 = DEFAULT_LAYER1;
            self.layer2 = DEFAULT_LAYER2;
        }
        if !(1..=MAX_FRAME_SKIP).contains(&self.frame_skip) {
            self.frame_skip = 1;
        }
        self
    }

    /// Non-zero layer indices, in draw order.
    pub fn active_layers(&self) -> Vec<usize> {
        [self.layer1, self.layer2].into_iter().filter(|&l| l != 0).collect()
    }

    /// Blend weight per active layer.
    pub fn alphas(&self) -> [f64; 2] {
        match self.alpha {
            Some(alpha) => alpha,
            None if self.active_layers().len() == 2 => [0.5, 0.5],
            None => [1.0, 1.0],
        }
    }
}

/// Active layers blended into one 256x224 frame.
pub struct BattleScene {
    layers: Vec<(BackgroundLayer, f64)>,
    letterbox: u32,
    frame_skip: u32,
    tick: u64,
}

impl BattleScene {
    pub fn new(rom: &Rom, config: &SceneConfig) -> Result<Self, RomError> {
        let config = config.clone().sanitize();
        let alphas = config.alphas();
        let layers = config
            .active_layers()
            .into_iter()
            .zip(alphas)
            .map(|(entry, alpha)| Ok((BackgroundLayer::new(rom, entry)?, alpha)))
            .collect::<Result<Vec<_>, RomError>>()?;

        log(LogCategory::Scene, LogLevel::Info, || {
            format!(
                "scene: layers {:?}, letterbox {}, frame skip {}",
                config.active_layers(),
                config.aspect_ratio.letterbox(),
                config.frame_skip
            )
        });

        Ok(Self {
            layers,
            letterbox: config.aspect_ratio.letterbox(),
            frame_skip: config.frame_skip,
            tick: 0,
        })
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn layers(&self) -> impl Iterator<Item = &BackgroundLayer> {
        self.layers.iter().map(|(layer, _)| layer)
    }

    /// Draw every layer at `tick`; the first one clears `dst`.
    pub fn render_frame(&mut self, tick: u64, dst: &mut Frame) {
        let letterbox = self.letterbox;
        for (i, (layer, alpha)) in self.layers.iter_mut().enumerate() {
            layer.overlay_frame(dst, letterbox, tick, *alpha, i == 0);
        }
    }

    /// Render `count` frames at ticks `0, skip, 2 * skip, ...`.
    pub fn pre_render(&mut self, count: usize) -> Vec<Frame> {
        log(LogCategory::Scene, LogLevel::Info, || {
            format!("pre-rendering {} frame(s)", count)
        });
        let skip = self.frame_skip as u64;
        let frames: Vec<Frame> = (0..count)
            .map(|i| {
                let mut frame = Frame::new(SNES_WIDTH, SNES_HEIGHT);
                self.render_frame(i as u64 * skip, &mut frame);
                frame
            })
            .collect();
        log(LogCategory::Scene, LogLevel::Info, || {
            format!("pre-rendered {} frame(s)", frames.len())
        });
        frames
    }
}

impl FrameSource for BattleScene {
    type Error = RomError;

    fn reset(&mut self) {
        self.tick = 0;
    }

    fn step_frame(&mut self) -> Result<Frame, Self::Error> {
        let mut frame = Frame::new(SNES_WIDTH, SNES_HEIGHT);
        self.render_frame(self.tick, &mut frame);
        self.tick += self.frame_skip as u64;
        Ok(frame)
    }

    fn frame_size(&self) -> (u32, u32) {
        (SNES_WIDTH, SNES_HEIGHT)
    }

    fn debug_state(&self) -> Value {
        let layers: Vec<Value> = self
            .layers
            .iter()
            .map(|(layer, alpha)| {
                let mut state = layer.debug_state();
                state["alpha"] = serde_json::json!(alpha);
                state
            })
            .collect();
        serde_json::json!({
            "tick": self.tick,
            "frame_skip": self.frame_skip,
            "letterbox": self.letterbox,
            "layers": layers,
        })
    }
}
