use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use exif_sig::composite::CompositeEngine;
use exif_sig::config::{self, CompositeMode, SignatureBasis};
use exif_sig::pipeline::{self, BatchSummary};

#[derive(Parser, Debug)]
#[command(
    name = "exif-sig",
    version,
    about = "Sign JPEG photos with a signature watermark and an EXIF caption, writing <name>-sig.jpg copies"
)]
struct Cli {
    /// Folder to process recursively (or a single .jpg)
    #[arg(value_name = "DIRECTORY")]
    directory: Option<PathBuf>,

    /// Don't draw the EXIF caption (overlay mode)
    #[arg(long = "no-exif")]
    no_exif: bool,

    /// Center the signature horizontally
    #[arg(long)]
    center: bool,

    /// Signature width as a fraction of the image's longest edge [default: 0.15]
    #[arg(long, value_name = "RATIO")]
    size: Option<f64>,

    /// Layout to produce
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Measure --size against the image width instead of the longest edge
    #[arg(long)]
    scale_by_width: bool,

    /// Directory holding sig.png, the font and footer templates (default: next to binary)
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// List the files that would be written without writing them
    #[arg(long)]
    dry_run: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Signature + caption additively blended over the photo
    Overlay,
    /// Camera-make footer template stacked below the photo
    Footer,
}

impl From<Mode> for CompositeMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Overlay => CompositeMode::Overlay,
            Mode::Footer => CompositeMode::Footer,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let Some(root) = cli.directory.as_deref() else {
        anyhow::bail!("No input directory specified. Use --help for usage.");
    };
    if !root.exists() {
        anyhow::bail!("Path does not exist: {}", root.display());
    }

    // Load config, then let flags override it
    let mut config = config::Config::load(cli.config.as_deref())?;
    if cli.no_exif {
        config.overlay.show_caption = false;
    }
    if cli.center {
        config.overlay.center = true;
    }
    if let Some(size) = cli.size {
        config.overlay.signature_ratio = size;
    }
    if cli.scale_by_width {
        config.overlay.signature_basis = SignatureBasis::Width;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(ref assets) = cli.assets {
        config.assets.directory = Some(assets.clone());
    }
    if cli.dry_run {
        config.output.dry_run = true;
    }
    config.validate()?;

    let engine = CompositeEngine::from_config(&config)?;
    log::debug!("Assets: {}", engine.assets().dir().display());

    // Collect images
    let images = pipeline::collect_images(root, &config.output.suffix);
    if images.is_empty() {
        log::warn!("No .jpg files found under {}", root.display());
    } else {
        log::info!("Found {} image(s) to process ({:?} mode)", images.len(), config.mode);
    }
    if config.output.dry_run {
        log::info!("Dry run: outputs are planned, nothing is written");
    }

    let results = pipeline::run_batch(&images, &engine, &config);

    // JSON output
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    // Summary
    let summary = BatchSummary::from_results(&results);
    log::info!(
        "Done: {} written, {} planned, {} skipped, {} failed out of {} images",
        summary.written,
        summary.planned,
        summary.skipped,
        summary.failed,
        summary.total
    );

    Ok(())
}
