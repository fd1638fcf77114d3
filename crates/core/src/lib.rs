//! Core primitives shared by the background renderer crates.

pub mod graphics;
pub mod logging;
pub mod ppu;
pub mod types {
    use serde::{Deserialize, Serialize};

    /// Bytes per RGBA8 pixel.
    pub const BYTES_PER_PIXEL: usize = 4;

    /// An RGBA8 pixel grid, row-major, `width * 4` bytes per row.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u8>,
    }

    impl Frame {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
            }
        }

        /// Row stride in bytes.
        pub fn stride(&self) -> usize {
            self.width as usize * BYTES_PER_PIXEL
        }

        /// Byte offset of the pixel at `(x, y)`.
        #[inline]
        pub fn offset(&self, x: usize, y: usize) -> usize {
            y * self.stride() + x * BYTES_PER_PIXEL
        }

        /// Read a pixel as `[r, g, b, a]`.
        pub fn rgba(&self, x: usize, y: usize) -> [u8; 4] {
            let o = self.offset(x, y);
            [
                self.pixels[o],
                self.pixels[o + 1],
                self.pixels[o + 2],
                self.pixels[o + 3],
            ]
        }

        /// Fill every pixel with the given `[r, g, b, a]` value.
        pub fn fill(&mut self, rgba: [u8; 4]) {
            for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&rgba);
            }
        }
    }
}

use serde_json::Value;

/// Something that produces a sequence of frames, one per call.
///
/// Frontends drive a `FrameSource` without knowing what it renders.
pub trait FrameSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Rewind to the first frame of the animation.
    fn reset(&mut self);

    /// Produce the next frame and advance the animation clock.
    fn step_frame(&mut self) -> Result<types::Frame, Self::Error>;

    /// Native output size as `(width, height)`.
    fn frame_size(&self) -> (u32, u32);

    /// A JSON snapshot of the producer's state for debugging.
    fn debug_state(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_initialization() {
        let f = types::Frame::new(10, 10);
        assert_eq!(f.pixels.len(), 400);
        assert_eq!(f.width, 10);
        assert_eq!(f.height, 10);
        assert_eq!(f.stride(), 40);
    }

    #[test]
    fn frame_offsets_are_row_major() {
        let f = types::Frame::new(256, 224);
        assert_eq!(f.offset(0, 0), 0);
        assert_eq!(f.offset(1, 0), 4);
        assert_eq!(f.offset(0, 1), 1024);
        assert_eq!(f.offset(255, 223), 223 * 1024 + 255 * 4);
    }

    #[test]
    fn frame_fill_and_read() {
        let mut f = types::Frame::new(2, 2);
        f.fill([1, 2, 3, 255]);
        assert_eq!(f.rgba(1, 1), [1, 2, 3, 255]);
    }

    struct Counter {
        frames: u32,
    }

    impl FrameSource for Counter {
        type Error = std::convert::Infallible;

        fn reset(&mut self) {
            self.frames = 0;
        }

        fn step_frame(&mut self) -> Result<types::Frame, Self::Error> {
            self.frames += 1;
            Ok(types::Frame::new(2, 2))
        }

        fn frame_size(&self) -> (u32, u32) {
            (2, 2)
        }

        fn debug_state(&self) -> Value {
            serde_json::json!({ "frames": self.frames })
        }
    }

    #[test]
    fn frame_source_steps_and_resets() {
        let mut src = Counter { frames: 0 };
        let frame = src.step_frame().expect("infallible");
        assert_eq!((frame.width, frame.height), src.frame_size());
        src.step_frame().expect("infallible");
        assert_eq!(src.debug_state()["frames"], 2);
        src.reset();
        assert_eq!(src.debug_state()["frames"], 0);
    }

    #[test]
    fn frame_serialization_roundtrip() {
        let mut f = types::Frame::new(1, 1);
        f.fill([9, 8, 7, 255]);
        let s = serde_json::to_string(&f).expect("serialize");
        let back: types::Frame = serde_json::from_str(&s).expect("deserialize");
        assert_eq!(back, f);
    }
}
