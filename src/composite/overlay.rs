use ab_glyph::FontVec;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};

use super::{blend, text};
use crate::config::{OverlayConfig, SignatureBasis};

/// Where the scaled signature lands on the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Signature size for a given source: `ratio × basis` wide, native aspect ratio.
pub fn scaled_signature_size(
    signature: (u32, u32),
    source: (u32, u32),
    ratio: f64,
    basis: SignatureBasis,
) -> (u32, u32) {
    let (sig_w, sig_h) = signature;
    let (src_w, src_h) = source;
    let basis_px = match basis {
        SignatureBasis::LongestEdge => src_w.max(src_h),
        SignatureBasis::Width => src_w,
    };

    let width = ((ratio * f64::from(basis_px)) as u32).max(1);
    let height = ((f64::from(sig_h) * f64::from(width) / f64::from(sig_w.max(1))) as u32).max(1);
    (width, height)
}

/// Position a signature of `size` in the bottom-left (or bottom-center) of `source`.
pub fn place_signature(size: (u32, u32), source: (u32, u32), config: &OverlayConfig) -> Placement {
    let (width, height) = size;
    let (src_w, src_h) = source;
    let padding = (config.padding_ratio * f64::from(src_w)) as i64;

    let x = if config.center {
        i64::from(src_w / 2) - i64::from(width / 2)
    } else {
        padding
    };
    let y = i64::from(src_h) - i64::from(height) - padding;

    Placement { x, y, width, height }
}

/// Caption font size for a source of `source_width` pixels, never below 1.
pub fn caption_font_size(source_width: u32, config: &OverlayConfig) -> u32 {
    let scaled = config.reference_font_size as f64 * f64::from(source_width)
        / f64::from(config.reference_width.max(1));
    (scaled as u32).max(1)
}

/// Build the transparent layer holding the signature and optional caption.
pub fn build_layer(
    source: (u32, u32),
    signature: &RgbaImage,
    caption: Option<(&str, &FontVec)>,
    config: &OverlayConfig,
) -> RgbaImage {
    let (src_w, src_h) = source;
    let size = scaled_signature_size(
        signature.dimensions(),
        source,
        config.signature_ratio,
        config.signature_basis,
    );
    let placement = place_signature(size, source, config);
    log::debug!(
        "Signature {}x{} at ({}, {})",
        placement.width,
        placement.height,
        placement.x,
        placement.y
    );

    let scaled = imageops::resize(signature, placement.width, placement.height, FilterType::Lanczos3);
    let mut layer = RgbaImage::new(src_w, src_h);
    imageops::replace(&mut layer, &scaled, placement.x, placement.y);

    if let Some((caption, font)) = caption {
        let font_px = caption_font_size(src_w, config);
        let (text_w, text_h) = text::measure(font, font_px as f32, caption);
        let inset = i64::from(font_px / 5);
        let x = i64::from(src_w) - i64::from(text_w) - inset;
        let y = i64::from(src_h) - i64::from(text_h) - inset;
        text::draw(
            &mut layer,
            font,
            font_px as f32,
            config.caption_color,
            x as i32,
            y as i32,
            caption,
        );
    }

    layer
}

/// Overlay the signature (and caption) onto `source` with an additive blend.
pub fn compose(
    source: &DynamicImage,
    signature: &RgbaImage,
    caption: Option<(&str, &FontVec)>,
    config: &OverlayConfig,
) -> RgbImage {
    let background = source.to_rgba8();
    let layer = build_layer(background.dimensions(), signature, caption, config);
    blend::additive_blend(&background, &layer, config.opacity)
}
