//! Caption schema and formatting.
//!
//! [`CaptionFields::from_tags`] projects a [`RawTagSet`](crate::exif::RawTagSet)
//! onto the fixed eight-field schema, and [`format_caption`] renders it as the
//! one-line caption drawn onto the image.

mod fields;
mod format;

pub use fields::{CaptionFields, FocalLength, UNKNOWN, UNKNOWN_NUMBER};
pub use format::{format_caption, format_exposure};
