use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, RgbImage};
use img_parts::Bytes;
use img_parts::ImageEXIF;
use img_parts::jpeg::Jpeg;
use std::path::Path;

/// JPEG quality used for every output file.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Extract the raw EXIF payload (TIFF data after `Exif\0\0`) from JPEG bytes.
///
/// Returns `None` for non-JPEG data or a JPEG without an EXIF APP1 segment.
pub fn extract_exif(jpeg_bytes: &[u8]) -> Option<Bytes> {
    let jpeg = Jpeg::from_bytes(Bytes::copy_from_slice(jpeg_bytes)).ok()?;
    jpeg.exif().filter(|exif| !exif.is_empty())
}

/// Encode an RGB buffer as JPEG and splice the given EXIF payload in unchanged.
pub fn encode_jpeg(image: &RgbImage, quality: u8, exif: Option<&Bytes>) -> Result<Vec<u8>> {
    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, quality);
    encoder
        .write_image(
            image,
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .context("Failed to encode JPEG")?;

    let Some(exif) = exif else {
        return Ok(encoded);
    };

    let mut jpeg = Jpeg::from_bytes(Bytes::from(encoded))
        .map_err(|e| anyhow::anyhow!("Failed to parse encoded JPEG: {e}"))?;
    jpeg.set_exif(Some(exif.clone()));
    log::debug!("Re-attached {} bytes of EXIF", exif.len());

    Ok(jpeg.encoder().bytes().to_vec())
}

/// Encode and write a JPEG, carrying the source's EXIF payload over verbatim.
pub fn write_jpeg(path: &Path, image: &RgbImage, quality: u8, exif: Option<&Bytes>) -> Result<()> {
    let output = encode_jpeg(image, quality, exif)?;
    std::fs::write(path, &output)
        .with_context(|| format!("Failed to write JPEG file {}", path.display()))?;
    Ok(())
}
