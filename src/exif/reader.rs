use anyhow::{Context, Result};
use nom_exif::*;
use std::path::Path;

use super::tags::{self, Rational, RawTagSet, TagValue};

/// The EXIF tags the caption is built from, paired with the names used in [`RawTagSet`].
const CAPTION_TAGS: &[(ExifTag, &str)] = &[
    (ExifTag::Make, tags::TAG_MAKE),
    (ExifTag::Model, tags::TAG_MODEL),
    (ExifTag::LensModel, tags::TAG_LENS_MODEL),
    (ExifTag::FocalLength, tags::TAG_FOCAL_LENGTH),
    (ExifTag::ISOSpeedRatings, tags::TAG_ISO),
    (ExifTag::FNumber, tags::TAG_F_NUMBER),
    (ExifTag::ExposureTime, tags::TAG_EXPOSURE_TIME),
    (ExifTag::DateTimeOriginal, tags::TAG_DATE_TIME_ORIGINAL),
];

/// Read the caption-relevant EXIF tags from an image file.
///
/// A file without an EXIF block is not an error: it yields an empty
/// [`RawTagSet`] and a warning. Only failing to open the file is reported.
pub fn read_tags(path: &Path) -> Result<RawTagSet> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::file_path(path).context("Failed to open image file")?;

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(e) => {
            log::warn!("No EXIF metadata found for {}: {e}", path.display());
            return Ok(RawTagSet::default());
        }
    };
    let exif: Exif = iter.into();

    let mut tags = RawTagSet::new();
    for (tag, name) in CAPTION_TAGS {
        if let Some(value) = exif.get(*tag).and_then(entry_to_tag_value) {
            tags.insert(*name, value);
        }
    }

    log::debug!("Read {} caption tag(s) from {}", tags.len(), path.display());
    Ok(tags)
}

/// Convert a nom-exif entry into a [`TagValue`].
///
/// Array entries (e.g. ISO written as a list) collapse to their first element.
fn entry_to_tag_value(val: &EntryValue) -> Option<TagValue> {
    match val {
        EntryValue::URational(r) => Some(TagValue::Rational(Rational::new(r.0, r.1))),
        EntryValue::URationalArray(v) => v
            .first()
            .map(|r| TagValue::Rational(Rational::new(r.0, r.1))),
        EntryValue::U8(v) => Some(TagValue::Integer(u64::from(*v))),
        EntryValue::U16(v) => Some(TagValue::Integer(u64::from(*v))),
        EntryValue::U32(v) => Some(TagValue::Integer(u64::from(*v))),
        EntryValue::U64(v) => Some(TagValue::Integer(*v)),
        EntryValue::U16Array(v) => v.first().map(|n| TagValue::Integer(u64::from(*n))),
        EntryValue::U32Array(v) => v.first().map(|n| TagValue::Integer(u64::from(*n))),
        EntryValue::F32(v) => Some(TagValue::Float(f64::from(*v))),
        EntryValue::F64(v) => Some(TagValue::Float(*v)),
        other => entry_to_string(other).map(TagValue::Text),
    }
}

/// Convert an EntryValue to an Option<String>.
fn entry_to_string(val: &EntryValue) -> Option<String> {
    let s = val.to_string();
    let s = s.trim().trim_matches('"').trim_end_matches('\0').trim().to_string();
    if s.is_empty() { None } else { Some(s) }
}
