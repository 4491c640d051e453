use std::collections::HashMap;
use std::fmt;

/// Tag names read from the EXIF block. Only these reach the caption.
pub const TAG_MAKE: &str = "Make";
pub const TAG_MODEL: &str = "Model";
pub const TAG_LENS_MODEL: &str = "LensModel";
pub const TAG_FOCAL_LENGTH: &str = "FocalLength";
pub const TAG_ISO: &str = "ISOSpeedRatings";
pub const TAG_F_NUMBER: &str = "FNumber";
pub const TAG_EXPOSURE_TIME: &str = "ExposureTime";
pub const TAG_DATE_TIME_ORIGINAL: &str = "DateTimeOriginal";

/// An unsigned EXIF rational, kept exactly as the camera recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self { numerator, denominator }
    }

    /// The value as a float, or `None` for a zero denominator.
    pub fn to_f64(self) -> Option<f64> {
        if self.denominator == 0 {
            None
        } else {
            Some(self.numerator as f64 / self.denominator as f64)
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A decoded tag value.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    Integer(u64),
    Float(f64),
    Rational(Rational),
}

impl TagValue {
    /// Numeric view of the value. Text is parsed leniently.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Integer(v) => Some(*v as f64),
            TagValue::Float(v) => Some(*v),
            TagValue::Rational(r) => r.to_f64(),
            TagValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(s) => f.write_str(s),
            TagValue::Integer(v) => write!(f, "{v}"),
            TagValue::Float(v) => write!(f, "{v}"),
            TagValue::Rational(r) => write!(f, "{r}"),
        }
    }
}

/// Tag name → value, as decoded from one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTagSet {
    tags: HashMap<String, TagValue>,
}

impl RawTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: TagValue) {
        self.tags.insert(name.into(), value);
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: TagValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.tags.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}
