//! Rendering layers and scenes from a synthetic image.

mod common;

use bbg_core::FrameSource;
use bbg_earthbound::palette_cycle::{CycleParams, PaletteCycle, StaticCycle};
use bbg_earthbound::{
    AspectRatio, BackgroundLayer, BattleScene, Rom, SceneConfig, SNES_HEIGHT, SNES_WIDTH,
};
use common::{entry_bytes, shifting_effect, RomBuilder};

const RED: [u8; 4] = [0xF8, 0, 0, 255];
const GREEN: [u8; 4] = [0, 0xF8, 0, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Entry 1 is static; entry 2 shifts by 3 pixels from tick 1 on.
fn rom() -> Rom {
    let mut builder = RomBuilder::new();
    builder.set_distortion(1, shifting_effect(1));
    builder.set_entry(2, entry_bytes(0, 0, 2, 0x0001_0000));
    Rom::new(builder.build()).unwrap()
}

#[test]
fn test_layer_render_draws_tiles() {
    let rom = rom();
    let mut layer = BackgroundLayer::new(&rom, 1).unwrap();
    let frame = layer.render(0);

    assert_eq!((frame.width, frame.height), (SNES_WIDTH, SNES_HEIGHT));
    assert_eq!(frame.rgba(0, 0), RED);
    assert_eq!(frame.rgba(7, 0), GREEN);
    assert_eq!(frame.rgba(3, 3), BLACK);
    assert_eq!(frame.rgba(248, 223), RED);
    // The full 256-row bitmap is kept even though only 224 rows are shown
    assert_eq!(layer.debug_state()["bitmap"], serde_json::json!([256, 256]));
}

#[test]
fn test_layer_distortion_moves_with_time() {
    let rom = rom();
    let mut layer = BackgroundLayer::new(&rom, 2).unwrap();

    let still = layer.render(0);
    assert_eq!(still.rgba(0, 10), RED);

    // Samples x + 3, so the red column appears at x = 5
    let moved = layer.render(1);
    assert_eq!(moved.rgba(5, 10), RED);
    assert_eq!(moved.rgba(0, 10), BLACK);
}

struct Inverted {
    colors: Vec<u32>,
    cycles: usize,
}

impl PaletteCycle for Inverted {
    fn cycle(&mut self) {
        self.cycles += 1;
    }

    fn colors(&self, _subpalette: usize) -> &[u32] {
        &self.colors
    }
}

#[test]
fn test_custom_palette_cycle() {
    let rom = rom();
    let cycle = Inverted {
        colors: vec![0xFFFFFFFF, 0xFF000000, 0xFF000000, 0xFF000000],
        cycles: 0,
    };
    let mut layer = BackgroundLayer::new(&rom, 1).unwrap().with_cycle(Box::new(cycle));
    let frame = layer.render(0);
    assert_eq!(frame.rgba(0, 0), BLACK);
    assert_eq!(frame.rgba(3, 3), [0xFF, 0xFF, 0xFF, 255]);

    let palette = rom.palette(0).unwrap().clone();
    let mut stock = StaticCycle::new(palette, CycleParams::default());
    stock.cycle();
    assert_eq!(stock.colors(0)[1], 0xFFF80000);
}

#[test]
fn test_two_layers_blend_additively() {
    let rom = rom();
    let config = SceneConfig {
        layer1: 1,
        layer2: 2,
        ..SceneConfig::default()
    };
    let mut scene = BattleScene::new(&rom, &config).unwrap();
    let frame = scene.step_frame().unwrap();

    // 0.5 * 248 from each layer
    assert_eq!(frame.rgba(0, 0), [248, 0, 0, 255]);
    assert_eq!(frame.rgba(3, 0), BLACK);
}

#[test]
fn test_single_layer_uses_full_alpha() {
    let rom = rom();
    let config = SceneConfig {
        layer1: 0,
        layer2: 1,
        ..SceneConfig::default()
    };
    let mut scene = BattleScene::new(&rom, &config).unwrap();
    assert_eq!(scene.layers().count(), 1);
    assert_eq!(scene.step_frame().unwrap().rgba(0, 0), RED);
}

#[test]
fn test_letterbox_from_aspect_ratio() {
    let rom = rom();
    let config = SceneConfig {
        layer1: 1,
        layer2: 0,
        aspect_ratio: AspectRatio::Wide,
        ..SceneConfig::default()
    };
    let mut scene = BattleScene::new(&rom, &config).unwrap();
    let frame = scene.step_frame().unwrap();
    assert_eq!(frame.rgba(0, 15), BLACK);
    assert_eq!(frame.rgba(0, 16), RED);
    assert_eq!(frame.rgba(0, 208), RED);
    assert_eq!(frame.rgba(0, 209), BLACK);
}

#[test]
fn test_step_frame_advances_by_frame_skip() {
    let rom = rom();
    let config = SceneConfig {
        layer1: 2,
        layer2: 0,
        frame_skip: 3,
        ..SceneConfig::default()
    };
    let mut scene = BattleScene::new(&rom, &config).unwrap();
    assert_eq!(scene.frame_size(), (256, 224));

    let frames: Vec<_> = (0..3).map(|_| scene.step_frame().unwrap()).collect();
    assert_eq!(scene.tick(), 9);
    assert_eq!(scene.debug_state()["tick"], 9);
    assert_eq!(scene.debug_state()["layers"][0]["entry"], 2);

    scene.reset();
    assert_eq!(scene.tick(), 0);
    let pre = scene.pre_render(3);
    assert_eq!(pre, frames);
}

#[test]
fn test_pre_render_matches_render_frame() {
    let rom = rom();
    let config = SceneConfig {
        layer1: 2,
        layer2: 1,
        ..SceneConfig::default()
    };
    let mut scene = BattleScene::new(&rom, &config).unwrap();
    let frames = scene.pre_render(2);
    assert_eq!(frames.len(), 2);

    let mut expected = bbg_core::types::Frame::new(SNES_WIDTH, SNES_HEIGHT);
    scene.render_frame(1, &mut expected);
    assert_eq!(frames[1], expected);
}
