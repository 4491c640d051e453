use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::caption::CaptionFields;
use crate::composite::CompositeEngine;
use crate::config::Config;
use crate::exif::{self, RawTagSet};

/// Extension of the files the batch picks up (compared case-insensitively).
const TARGET_EXTENSION: &str = ".jpg";

/// What happened to one input file.
///
/// Every file ends in exactly one of these; none of them stops the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessOutcome {
    /// The signed copy was written.
    Written { output: PathBuf },
    /// Dry run: the signed copy would have been written here.
    Planned { output: PathBuf },
    /// The file is out of scope (e.g. no footer template for its make).
    Skipped { reason: String },
    /// Something broke while reading, composing or writing.
    Failed { reason: String },
}

/// The result of processing a single image.
///
/// # Example
///
/// ```rust,no_run
/// # use exif_sig::pipeline::{process_image, ProcessOutcome};
/// # use exif_sig::composite::CompositeEngine;
/// # use exif_sig::config::Config;
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// let engine = CompositeEngine::from_config(&config)?;
/// let result = process_image("photo.jpg".as_ref(), &engine, &config);
///
/// if let ProcessOutcome::Written { ref output } = result.outcome {
///     println!("Signed copy: {}", output.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub path: PathBuf,
    /// Camera make as read from EXIF (or `"Unknown"`).
    pub device_make: String,
    pub outcome: ProcessOutcome,
}

/// Tally of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub written: usize,
    pub planned: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[ProcessResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.outcome {
                ProcessOutcome::Written { .. } => summary.written += 1,
                ProcessOutcome::Planned { .. } => summary.planned += 1,
                ProcessOutcome::Skipped { .. } => summary.skipped += 1,
                ProcessOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

/// Collect candidate JPEGs under `root`.
///
/// Directories are walked recursively (following symlinks). A file qualifies
/// when its name ends in `.jpg` (any case) and does not already end in the
/// output `suffix`, so re-running over a processed folder signs nothing twice.
/// A file path is accepted as-is if it qualifies. Results are sorted.
pub fn collect_images(root: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut images = Vec::new();

    if root.is_file() {
        if is_candidate(root, suffix) {
            images.push(root.to_path_buf());
        } else {
            log::warn!("Skipping unsupported file: {}", root.display());
        }
    } else if root.is_dir() {
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && is_candidate(p, suffix) {
                images.push(p.to_path_buf());
            }
        }
    } else {
        log::warn!("Path does not exist: {}", root.display());
    }

    images.sort();
    images
}

/// Check whether a file should be signed.
fn is_candidate(path: &Path, suffix: &str) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    name.ends_with(TARGET_EXTENSION) && !name.ends_with(&suffix.to_lowercase())
}

/// Sibling output path: the file name with its last 4 characters (the
/// extension) replaced by `suffix`.
pub fn output_path_for(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let keep = name.chars().count().saturating_sub(TARGET_EXTENSION.len());
    let stem: String = name.chars().take(keep).collect();
    path.with_file_name(format!("{stem}{suffix}"))
}

/// Read the caption tags, degrading to an empty set when the file can't be parsed.
fn read_tags_or_default(path: &Path) -> RawTagSet {
    match exif::read_tags(path) {
        Ok(tags) => tags,
        Err(e) => {
            log::warn!("Failed to read EXIF from {}: {e:#}", path.display());
            RawTagSet::default()
        }
    }
}

/// Process a single image: read EXIF → compose → write `<name>-sig.jpg`.
///
/// Never returns an error; every failure becomes a [`ProcessOutcome`].
pub fn process_image(path: &Path, engine: &CompositeEngine, config: &Config) -> ProcessResult {
    let fields = CaptionFields::from_tags(&read_tags_or_default(path));
    let outcome = match sign_image(path, &fields, engine, config) {
        Ok(outcome) => outcome,
        Err(e) => ProcessOutcome::Failed {
            reason: format!("{e:#}"),
        },
    };

    ProcessResult {
        path: path.to_path_buf(),
        device_make: fields.device_make,
        outcome,
    }
}

fn sign_image(
    path: &Path,
    fields: &CaptionFields,
    engine: &CompositeEngine,
    config: &Config,
) -> Result<ProcessOutcome> {
    if let Err(e) = engine.check(fields) {
        return Ok(ProcessOutcome::Skipped {
            reason: e.to_string(),
        });
    }

    let output = output_path_for(path, &config.output.suffix);
    if config.output.dry_run {
        return Ok(ProcessOutcome::Planned { output });
    }

    let bytes = std::fs::read(path).context("Failed to read file")?;
    let original_exif = exif::extract_exif(&bytes);
    let source = image::load_from_memory(&bytes).context("Failed to decode image")?;
    drop(bytes);

    let composed = match engine.compose(&source, fields) {
        Ok(img) => img,
        Err(e) if e.is_skip() => {
            return Ok(ProcessOutcome::Skipped {
                reason: e.to_string(),
            });
        }
        Err(e) => return Err(e).context("Failed to compose signature"),
    };
    drop(source);

    exif::write_jpeg(
        &output,
        &composed,
        config.output.jpeg_quality,
        original_exif.as_ref(),
    )?;

    Ok(ProcessOutcome::Written { output })
}

/// Process every image in order, logging progress and each outcome.
pub fn run_batch(images: &[PathBuf], engine: &CompositeEngine, config: &Config) -> Vec<ProcessResult> {
    let total = images.len();
    let mut results = Vec::with_capacity(total);

    for (i, image_path) in images.iter().enumerate() {
        log::info!("[{}/{}] Processing: {}", i + 1, total, image_path.display());

        let result = process_image(image_path, engine, config);
        match &result.outcome {
            ProcessOutcome::Written { output } => log::info!("  Wrote: {}", output.display()),
            ProcessOutcome::Planned { output } => log::info!("  Would write: {}", output.display()),
            ProcessOutcome::Skipped { reason } => {
                log::warn!("  Skipped {}: {reason}", image_path.display())
            }
            ProcessOutcome::Failed { reason } => {
                log::error!("  Error processing {}: {reason}", image_path.display())
            }
        }

        results.push(result);
    }

    results
}
