use image::{Rgb, RgbImage, RgbaImage};

/// Additive blend of one channel: `clamp(bg + fg × opacity, 0, 255)`, truncated to 8 bits.
pub fn additive_channel(bg: u8, fg: u8, opacity: f64) -> u8 {
    (f64::from(bg) + f64::from(fg) * opacity).clamp(0.0, 255.0) as u8
}

/// Additively blend `layer` onto `background` and drop alpha.
///
/// Each layer pixel contributes in proportion to its own alpha, so fully
/// transparent regions leave the background untouched and an opaque pixel
/// adds exactly `fg × opacity`. Both buffers must have the same dimensions.
pub fn additive_blend(background: &RgbaImage, layer: &RgbaImage, opacity: f64) -> RgbImage {
    debug_assert_eq!(background.dimensions(), layer.dimensions());

    RgbImage::from_fn(background.width(), background.height(), |x, y| {
        let bg = background.get_pixel(x, y);
        let fg = layer.get_pixel(x, y);
        let weight = opacity * f64::from(fg[3]) / 255.0;
        Rgb([
            additive_channel(bg[0], fg[0], weight),
            additive_channel(bg[1], fg[1], weight),
            additive_channel(bg[2], fg[2], weight),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn channel_boundaries() {
        assert_eq!(additive_channel(0, 0, 0.6), 0);
        assert_eq!(additive_channel(255, 255, 0.6), 255);
        assert_eq!(additive_channel(0, 255, 0.6), 153);
        assert_eq!(additive_channel(255, 0, 0.6), 255);
    }

    #[test]
    fn channel_is_clamped() {
        assert_eq!(additive_channel(200, 200, 0.6), 255);
        assert_eq!(additive_channel(100, 100, 0.6), 160);
        assert_eq!(additive_channel(100, 100, 0.0), 100);
    }

    #[test]
    fn transparent_layer_leaves_background() {
        let bg = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let layer = RgbaImage::new(4, 4);
        let out = additive_blend(&bg, &layer, 0.6);
        assert!(out.pixels().all(|p| *p == Rgb([10, 20, 30])));
    }

    #[test]
    fn opaque_layer_adds_scaled_value() {
        let bg = RgbaImage::from_pixel(2, 2, Rgba([0, 100, 250, 255]));
        let layer = RgbaImage::from_pixel(2, 2, Rgba([255, 100, 255, 255]));
        let out = additive_blend(&bg, &layer, 0.6);
        assert_eq!(*out.get_pixel(1, 1), Rgb([153, 160, 255]));
    }

    #[test]
    fn translucent_layer_adds_in_proportion_to_alpha() {
        let bg = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let layer = RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 128]));
        let out = additive_blend(&bg, &layer, 0.6);
        // 128 × 0.6 × 128/255 ≈ 38.5
        assert_eq!(*out.get_pixel(0, 0), Rgb([38, 38, 38]));
    }
}
