use exif_sig::caption::{format_caption, CaptionFields};
use exif_sig::composite::CompositeEngine;
use exif_sig::config::{CompositeMode, Config};
use exif_sig::exif::{self, DEFAULT_JPEG_QUALITY};
use exif_sig::pipeline::{collect_images, process_image, run_batch, BatchSummary, ProcessOutcome};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use img_parts::Bytes;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// TIFF field types
const ASCII: u16 = 2;
const SHORT: u16 = 3;
const LONG: u16 = 4;
const RATIONAL: u16 = 5;

struct Entry {
    tag: u16,
    kind: u16,
    count: u32,
    data: Vec<u8>,
}

fn ascii(tag: u16, value: &str) -> Entry {
    let mut data = value.as_bytes().to_vec();
    data.push(0);
    Entry { tag, kind: ASCII, count: data.len() as u32, data }
}

fn short(tag: u16, value: u16) -> Entry {
    Entry { tag, kind: SHORT, count: 1, data: value.to_le_bytes().to_vec() }
}

fn long(tag: u16, value: u32) -> Entry {
    Entry { tag, kind: LONG, count: 1, data: value.to_le_bytes().to_vec() }
}

fn rational(tag: u16, num: u32, den: u32) -> Entry {
    let mut data = num.to_le_bytes().to_vec();
    data.extend_from_slice(&den.to_le_bytes());
    Entry { tag, kind: RATIONAL, count: 1, data }
}

/// Serialize one IFD placed at `offset`, with out-of-line values right after it.
fn ifd(entries: &[Entry], offset: u32) -> Vec<u8> {
    let table_len = 2 + 12 * entries.len() as u32 + 4;
    let mut table = (entries.len() as u16).to_le_bytes().to_vec();
    let mut values = Vec::new();

    for entry in entries {
        table.extend_from_slice(&entry.tag.to_le_bytes());
        table.extend_from_slice(&entry.kind.to_le_bytes());
        table.extend_from_slice(&entry.count.to_le_bytes());
        if entry.data.len() <= 4 {
            let mut inline = entry.data.clone();
            inline.resize(4, 0);
            table.extend_from_slice(&inline);
        } else {
            let at = offset + table_len + values.len() as u32;
            table.extend_from_slice(&at.to_le_bytes());
            values.extend_from_slice(&entry.data);
            if values.len() % 2 == 1 {
                values.push(0);
            }
        }
    }
    table.extend_from_slice(&0u32.to_le_bytes());
    table.extend_from_slice(&values);
    table
}

/// Little-endian TIFF payload with IFD0 (Make, Model) and an Exif sub-IFD.
fn exif_payload(make: &str, model: &str) -> Vec<u8> {
    let ifd0_entries = |exif_offset: u32| {
        vec![
            ascii(0x010F, make),
            ascii(0x0110, model),
            long(0x8769, exif_offset),
        ]
    };
    let ifd0_len = ifd(&ifd0_entries(0), 8).len() as u32;
    let exif_offset = 8 + ifd0_len;

    let exif_entries = vec![
        rational(0x829A, 1, 250),
        rational(0x829D, 28, 10),
        short(0x8827, 400),
        rational(0x920A, 23, 1),
        ascii(0xA434, "23mm f2"),
    ];

    let mut tiff = vec![b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
    tiff.extend_from_slice(&ifd(&ifd0_entries(exif_offset), 8));
    tiff.extend_from_slice(&ifd(&exif_entries, exif_offset));
    tiff
}

fn write_photo(path: &Path, make: &str, model: &str) -> Bytes {
    let exif = Bytes::from(exif_payload(make, model));
    let photo = RgbImage::from_pixel(320, 240, Rgb([30, 60, 90]));
    let bytes = exif::encode_jpeg(&photo, DEFAULT_JPEG_QUALITY, Some(&exif)).unwrap();
    std::fs::write(path, bytes).unwrap();
    exif
}

fn assets() -> TempDir {
    let dir = TempDir::new().unwrap();
    RgbaImage::from_pixel(60, 20, Rgba([255, 255, 255, 255]))
        .save(dir.path().join("sig.png"))
        .unwrap();
    dir
}

fn config_for(assets: &Path) -> Config {
    let mut config = Config::default();
    config.assets.directory = Some(assets.to_path_buf());
    config
}

fn font_path() -> Option<PathBuf> {
    [
        "assets/RobotoMono.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
        "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.exists())
}

#[test]
fn caption_from_embedded_exif() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("x100v.jpg");
    write_photo(&path, "FUJIFILM", "X100V");

    let fields = CaptionFields::from_tags(&exif::read_tags(&path).unwrap());
    assert_eq!(fields.device_make, "FUJIFILM");
    assert_eq!(
        format_caption(&fields).unwrap(),
        "X100V + 23mm f2  |  23mm, iso400, f/2.8, 1/250s"
    );
}

#[test]
fn overlay_output_keeps_original_exif_bytes() {
    let assets = assets();
    let photos = TempDir::new().unwrap();
    let input = photos.path().join("x100v.jpg");
    let original = write_photo(&input, "FUJIFILM", "X100V");

    let mut config = config_for(assets.path());
    config.overlay.show_caption = false;
    let engine = CompositeEngine::from_config(&config).unwrap();

    let result = process_image(&input, &engine, &config);
    let output = photos.path().join("x100v-sig.jpg");
    assert_eq!(result.outcome, ProcessOutcome::Written { output: output.clone() });

    let written = std::fs::read(&output).unwrap();
    assert_eq!(exif::extract_exif(&written).unwrap(), original);

    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (320, 240));
}

#[test]
fn overlay_with_caption() {
    let Some(font) = font_path() else {
        // Can't test without font file
        return;
    };
    let assets = assets();
    std::fs::copy(&font, assets.path().join("RobotoMono.ttf")).unwrap();
    let photos = TempDir::new().unwrap();
    let input = photos.path().join("x100v.jpg");
    write_photo(&input, "FUJIFILM", "X100V");

    let config = config_for(assets.path());
    let engine = CompositeEngine::from_config(&config).unwrap();
    let result = process_image(&input, &engine, &config);
    assert!(matches!(result.outcome, ProcessOutcome::Written { .. }), "{:?}", result.outcome);
}

#[test]
fn footer_selects_by_make_and_skips_unknown() {
    let Some(font) = font_path() else {
        return;
    };
    let assets = assets();
    std::fs::copy(&font, assets.path().join("RobotoMono.ttf")).unwrap();
    for file in ["watermark-sony.png", "watermark-hasselblad.png"] {
        RgbaImage::from_pixel(1600, 200, Rgba([0, 0, 0, 255]))
            .save(assets.path().join(file))
            .unwrap();
    }

    let photos = TempDir::new().unwrap();
    write_photo(&photos.path().join("a7.jpg"), "Sony Alpha 7", "ILCE-7M4");
    write_photo(&photos.path().join("x2d.jpg"), "HASSELBLAD X2D", "X2D 100C");
    write_photo(&photos.path().join("eos.jpg"), "Canon EOS", "EOS R5");

    let mut config = config_for(assets.path());
    config.mode = CompositeMode::Footer;
    let engine = CompositeEngine::from_config(&config).unwrap();

    let images = collect_images(photos.path(), &config.output.suffix);
    let results = run_batch(&images, &engine, &config);
    let summary = BatchSummary::from_results(&results);
    assert_eq!((summary.written, summary.skipped, summary.failed), (2, 1, 0));

    assert!(!photos.path().join("eos-sig.jpg").exists());
    let a7 = image::open(photos.path().join("a7-sig.jpg")).unwrap();
    assert_eq!((a7.width(), a7.height()), (320, 240 + 40));
}

#[test]
fn footer_canon_is_skipped_without_assets() {
    let photos = TempDir::new().unwrap();
    let input = photos.path().join("eos.jpg");
    write_photo(&input, "Canon EOS", "EOS R5");

    let assets = TempDir::new().unwrap();
    let mut config = config_for(assets.path());
    config.mode = CompositeMode::Footer;
    let engine = CompositeEngine::from_config(&config).unwrap();

    let result = process_image(&input, &engine, &config);
    assert_eq!(
        result.outcome,
        ProcessOutcome::Skipped { reason: "No template for Canon EOS".into() }
    );
    assert!(!photos.path().join("eos-sig.jpg").exists());
}
