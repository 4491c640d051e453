use ab_glyph::FontVec;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};

use super::text;
use crate::config::{FooterConfig, TemplateRule};

/// Pick the footer template for a camera make.
///
/// Rules are tried in order; a rule matches when its keyword appears
/// anywhere in the make, ignoring case.
pub fn select_template<'a>(make: &str, rules: &'a [TemplateRule]) -> Option<&'a TemplateRule> {
    let make = make.to_lowercase();
    rules
        .iter()
        .find(|rule| make.contains(&rule.keyword.to_lowercase()))
}

/// Draw the caption onto the template, left-aligned at `text_x` and vertically centered.
pub fn caption_template(template: &mut RgbaImage, caption: &str, font: &FontVec, config: &FooterConfig) {
    let (_, text_h) = text::measure(font, config.font_size, caption);
    let y = (i64::from(template.height()) - i64::from(text_h)) / 2;
    text::draw(
        template,
        font,
        config.font_size,
        config.text_color,
        config.text_x,
        y as i32,
        caption,
    );
}

/// Resize a template to `width`, keeping its aspect ratio.
pub fn fit_to_width(template: &RgbaImage, width: u32) -> RgbaImage {
    let (tw, th) = template.dimensions();
    let height = ((f64::from(th) * f64::from(width) / f64::from(tw.max(1))) as u32).max(1);
    imageops::resize(template, width, height, FilterType::Lanczos3)
}

/// Stack the (already captioned) template under `source` on an opaque canvas.
pub fn compose(source: &DynamicImage, template: &RgbaImage) -> RgbImage {
    let photo = source.to_rgb8();
    let (width, height) = photo.dimensions();
    let footer = DynamicImage::ImageRgba8(fit_to_width(template, width)).to_rgb8();
    log::debug!("Footer {}x{} below {}x{}", footer.width(), footer.height(), width, height);

    let mut canvas = RgbImage::new(width, height + footer.height());
    imageops::replace(&mut canvas, &photo, 0, 0);
    imageops::replace(&mut canvas, &footer, 0, i64::from(height));
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::text::tests::test_font_path;
    use image::{Rgb, Rgba};

    fn rules() -> Vec<TemplateRule> {
        FooterConfig::default().templates
    }

    // ── select_template ──────────────────────────────────────────────

    #[test]
    fn sony_make_selects_sony_template() {
        let rules = rules();
        let rule = select_template("Sony Alpha 7", &rules).unwrap();
        assert_eq!(rule.file, "watermark-sony.png");
        assert_eq!(select_template("SONY", &rules).unwrap().keyword, "sony");
    }

    #[test]
    fn hasselblad_any_case_selects_hasselblad_template() {
        let rules = rules();
        for make in ["HASSELBLAD X2D", "Hasselblad", "hasselblad x1d ii"] {
            let rule = select_template(make, &rules).unwrap();
            assert_eq!(rule.file, "watermark-hasselblad.png", "{make}");
        }
    }

    #[test]
    fn other_makes_have_no_template() {
        let rules = rules();
        assert!(select_template("Canon EOS", &rules).is_none());
        assert!(select_template("Unknown", &rules).is_none());
        assert!(select_template("", &rules).is_none());
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = rules();
        let rule = select_template("Hasselblad (Sony sensor)", &rules).unwrap();
        assert_eq!(rule.keyword, "hasselblad");
    }

    // ── fit_to_width / compose ───────────────────────────────────────

    #[test]
    fn template_resized_to_source_width() {
        let template = RgbaImage::from_pixel(2000, 200, Rgba([10, 10, 10, 255]));
        let fitted = fit_to_width(&template, 1000);
        assert_eq!(fitted.dimensions(), (1000, 100));
    }

    #[test]
    fn footer_stacks_below_source() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(600, 400, Rgb([200, 0, 0])));
        let template = RgbaImage::from_pixel(1200, 300, Rgba([0, 0, 200, 255]));

        let out = compose(&source, &template);
        assert_eq!(out.dimensions(), (600, 400 + 150));
        assert_eq!(*out.get_pixel(300, 10), Rgb([200, 0, 0]));
        assert_eq!(*out.get_pixel(300, 399), Rgb([200, 0, 0]));
        assert_eq!(*out.get_pixel(300, 475), Rgb([0, 0, 200]));
    }

    #[test]
    fn caption_drawn_centered_vertically() {
        let Some(path) = test_font_path() else {
            // Can't test without font file
            return;
        };
        let font = text::load_font(&path).unwrap();
        let config = FooterConfig::default();
        let mut template = RgbaImage::from_pixel(3000, 400, Rgba([255, 255, 255, 255]));
        caption_template(&mut template, "ILCE-7M4 + FE 35mm", &font, &config);

        let marked: Vec<(u32, u32)> = template
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] < 255)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!marked.is_empty());
        assert!(marked.iter().all(|(x, _)| *x >= 310));
        assert!(marked.iter().all(|(_, y)| *y > 100 && *y < 300));
    }
}
