use std::fmt;

use crate::exif::{self, Rational, RawTagSet, TagValue};

/// Placeholder for unknown text fields.
pub const UNKNOWN: &str = "Unknown";
/// Placeholder for unknown numeric fields.
pub const UNKNOWN_NUMBER: &str = "??";

/// Focal length as recorded, or unknown when the tag is missing or not numeric.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FocalLength {
    Millimetres(f64),
    #[default]
    Unknown,
}

impl fmt::Display for FocalLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocalLength::Millimetres(mm) => write!(f, "{mm}"),
            FocalLength::Unknown => f.write_str(UNKNOWN_NUMBER),
        }
    }
}

/// The fixed caption schema. Every field is always populated; missing tags
/// fall back to the documented placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionFields {
    /// ISO speed, `"??"` when absent.
    pub iso: String,
    /// Aperture as a decimal string (`"2.8"`), `"0.0"` when absent.
    pub f_number: String,
    /// Exposure time as recorded, `0/0` when absent.
    pub exposure_time: Rational,
    /// `DateTimeOriginal`, `"Unknown"` when absent.
    pub date_taken: String,
    pub device_model: String,
    pub device_make: String,
    pub lens_model: String,
    pub focal_length: FocalLength,
}

impl Default for CaptionFields {
    fn default() -> Self {
        Self {
            iso: UNKNOWN_NUMBER.to_string(),
            f_number: decimal_string(0.0),
            exposure_time: Rational::default(),
            date_taken: UNKNOWN.to_string(),
            device_model: UNKNOWN.to_string(),
            device_make: UNKNOWN.to_string(),
            lens_model: UNKNOWN.to_string(),
            focal_length: FocalLength::Unknown,
        }
    }
}

impl CaptionFields {
    /// Project a raw tag set onto the caption schema.
    pub fn from_tags(tags: &RawTagSet) -> Self {
        let text = |name: &str| {
            tags.get(name)
                .map(|v| v.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string())
        };

        Self {
            iso: tags
                .get(exif::TAG_ISO)
                .map(|v| v.to_string())
                .unwrap_or_else(|| UNKNOWN_NUMBER.to_string()),
            f_number: f_number_string(tags.get(exif::TAG_F_NUMBER)),
            exposure_time: exposure_rational(tags.get(exif::TAG_EXPOSURE_TIME)),
            date_taken: text(exif::TAG_DATE_TIME_ORIGINAL),
            device_model: text(exif::TAG_MODEL),
            device_make: text(exif::TAG_MAKE),
            lens_model: text(exif::TAG_LENS_MODEL),
            focal_length: tags
                .get(exif::TAG_FOCAL_LENGTH)
                .and_then(TagValue::as_f64)
                .map(FocalLength::Millimetres)
                .unwrap_or_default(),
        }
    }
}

/// Reduce an aperture value to a decimal string. A zero-denominator rational reads as 0.
fn f_number_string(value: Option<&TagValue>) -> String {
    match value {
        None => decimal_string(0.0),
        Some(TagValue::Text(s)) => s.clone(),
        Some(v) => decimal_string(v.as_f64().unwrap_or(0.0)),
    }
}

fn exposure_rational(value: Option<&TagValue>) -> Rational {
    match value {
        Some(TagValue::Rational(r)) => *r,
        Some(TagValue::Integer(secs)) => Rational::new(u32::try_from(*secs).unwrap_or(u32::MAX), 1),
        Some(other) => {
            log::debug!("Ignoring non-rational ExposureTime: {other}");
            Rational::default()
        }
        None => Rational::default(),
    }
}

/// Shortest round-trip decimal, always with a fractional part (`8` → `"8.0"`).
fn decimal_string(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
