use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

use crate::error::CompositeError;

/// Load a TrueType/OpenType font from disk.
pub fn load_font(font_path: &Path) -> Result<FontVec, CompositeError> {
    if !font_path.exists() {
        return Err(CompositeError::AssetMissing(font_path.to_path_buf()));
    }
    let font_data = std::fs::read(font_path)?;
    FontVec::try_from_vec(font_data).map_err(|_| CompositeError::InvalidFont(font_path.to_path_buf()))
}

/// Rendered width and height of `text` at `size` pixels.
pub fn measure(font: &FontVec, size: f32, text: &str) -> (u32, u32) {
    text_size(PxScale::from(size), font, text)
}

/// Draw `text` with its top-left corner at `(x, y)`. Glyphs falling outside the canvas are clipped.
pub fn draw(canvas: &mut RgbaImage, font: &FontVec, size: f32, color: [u8; 4], x: i32, y: i32, text: &str) {
    draw_text_mut(canvas, Rgba(color), x, y, PxScale::from(size), font, text);
}
