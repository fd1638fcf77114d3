//! PNG output for rendered frames.

use anyhow::{Context, Result};
use bbg_core::types::Frame;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// File name for frame `index` inside `dir`.
pub fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{:04}.png", index))
}

/// Write an RGBA8 frame as a PNG file.
pub fn write_png(path: &Path, frame: &Frame) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("writing PNG header to {}", path.display()))?;
    writer
        .write_image_data(&frame.pixels)
        .with_context(|| format!("writing PNG data to {}", path.display()))?;
    Ok(())
}
