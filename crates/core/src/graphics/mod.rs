//! Color helpers shared by the palette and rendering code.

pub mod color;

pub use color::ColorOps;
