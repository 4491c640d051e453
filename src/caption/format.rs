use super::fields::{CaptionFields, FocalLength, UNKNOWN};
use crate::error::CaptionError;
use crate::exif::Rational;

/// Format an exposure time the way photographers read it.
///
/// `0` denominator → `"Unknown"`, `1/n` stays a fraction, anything else is a
/// decimal with one fractional digit (`5/10` → `"0.5"`, `10/1` → `"10.0"`).
pub fn format_exposure(exposure: Rational) -> String {
    match exposure {
        Rational { denominator: 0, .. } => UNKNOWN.to_string(),
        Rational { numerator: 1, denominator } => format!("1/{denominator}"),
        Rational { numerator, denominator } => {
            format!("{:.1}", numerator as f64 / denominator as f64)
        }
    }
}

/// Render the single-line caption:
/// `"{model} + {lens}  |  {focal}mm, iso{iso}, f/{aperture}, {exposure}s"`.
///
/// The focal length is truncated to whole millimetres. An unknown focal
/// length has no integer form and fails with [`CaptionError::UnknownFocalLength`].
pub fn format_caption(fields: &CaptionFields) -> Result<String, CaptionError> {
    let focal_mm = match fields.focal_length {
        FocalLength::Millimetres(mm) if mm.is_finite() => mm.trunc() as i64,
        _ => return Err(CaptionError::UnknownFocalLength),
    };

    Ok(format!(
        "{} + {}  |  {}mm, iso{}, f/{}, {}s",
        fields.device_model,
        fields.lens_model,
        focal_mm,
        fields.iso,
        fields.f_number,
        format_exposure(fields.exposure_time),
    ))
}
