//! EXIF reading and passthrough.
//!
//! - [`read_tags`] — Read the caption-relevant tags from an image into a [`RawTagSet`]
//! - [`extract_exif`] / [`write_jpeg`] — Lift the original EXIF payload out of a JPEG
//!   and splice it unchanged into the encoded output

mod reader;
mod tags;
mod writer;

pub use reader::read_tags;
pub use tags::{
    Rational, RawTagSet, TagValue, TAG_DATE_TIME_ORIGINAL, TAG_EXPOSURE_TIME, TAG_FOCAL_LENGTH,
    TAG_F_NUMBER, TAG_ISO, TAG_LENS_MODEL, TAG_MAKE, TAG_MODEL,
};
pub use writer::{encode_jpeg, extract_exif, write_jpeg, DEFAULT_JPEG_QUALITY};
