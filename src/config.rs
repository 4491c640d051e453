use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::exif::DEFAULT_JPEG_QUALITY;

/// Top-level configuration for exif-sig.
///
/// Every section has defaults, so a config file only needs the values it
/// changes. CLI flags are applied on top of whatever was loaded.
///
/// # Loading
///
/// ```rust,no_run
/// use exif_sig::config::{CompositeMode, Config};
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.mode = CompositeMode::Footer;
/// config.overlay.signature_ratio = 0.2;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which composite engine to run.
    pub mode: CompositeMode,
    /// Where the signature, font and footer templates live.
    pub assets: AssetConfig,
    /// Signature overlay settings.
    pub overlay: OverlayConfig,
    /// Footer template settings.
    pub footer: FooterConfig,
    /// Output naming, quality and dry run.
    pub output: OutputConfig,
}

/// The two ways a signed image can be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeMode {
    /// Signature and caption additively blended over the photo.
    #[default]
    Overlay,
    /// Make-keyed footer template stacked below the photo.
    Footer,
}

/// Which source dimension the signature width is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureBasis {
    /// `max(width, height)`, so portrait shots get the same signature as landscape.
    #[default]
    LongestEdge,
    /// Source width only.
    Width,
}

/// Asset file names, resolved against `directory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Asset directory. `None` means the directory of the running executable.
    pub directory: Option<PathBuf>,
    pub signature: String,
    pub font: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Signature width as a fraction of the basis dimension.
    pub signature_ratio: f64,
    pub signature_basis: SignatureBasis,
    /// Center the signature horizontally instead of pinning it left.
    pub center: bool,
    /// Draw the EXIF caption in the bottom-right corner.
    pub show_caption: bool,
    /// Additive blend opacity.
    pub opacity: f64,
    /// Signature inset as a fraction of the source width.
    pub padding_ratio: f64,
    pub caption_color: [u8; 4],
    /// Caption font size at `reference_width`; scales linearly with width.
    pub reference_font_size: f32,
    pub reference_width: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    /// Caption font size in template pixels.
    pub font_size: f32,
    /// Caption left edge in template pixels.
    pub text_x: i32,
    pub text_color: [u8; 4],
    /// Tried in order; the first keyword found in the camera make wins.
    pub templates: Vec<TemplateRule>,
}

/// Maps a camera-make keyword to a footer template file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRule {
    /// Matched case-insensitively as a substring of the EXIF `Make`.
    pub keyword: String,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Replaces the input's 4-character extension. Inputs already ending in it are skipped.
    pub suffix: String,
    pub jpeg_quality: u8,
    /// If `true`, list what would be written without composing anything.
    pub dry_run: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            directory: None,
            signature: "sig.png".to_string(),
            font: "RobotoMono.ttf".to_string(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            signature_ratio: 0.15,
            signature_basis: SignatureBasis::LongestEdge,
            center: false,
            show_caption: true,
            opacity: 0.6,
            padding_ratio: 0.01,
            caption_color: [128, 128, 128, 128],
            reference_font_size: 60.0,
            reference_width: 5120,
        }
    }
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            font_size: 60.0,
            text_x: 316,
            text_color: [160, 160, 160, 255],
            templates: vec![
                TemplateRule {
                    keyword: "hasselblad".to_string(),
                    file: "watermark-hasselblad.png".to_string(),
                },
                TemplateRule {
                    keyword: "sony".to_string(),
                    file: "watermark-sony.png".to_string(),
                },
            ],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "-sig.jpg".to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            dry_run: false,
        }
    }
}

impl Config {
    /// Path of `config.json` next to the running executable.
    pub fn config_path() -> Result<PathBuf> {
        Ok(executable_dir()?.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if path.is_some() {
                log::warn!(
                    "Config file not found at {}. Using defaults.",
                    config_path.display()
                );
            } else {
                log::debug!("No config at {}, using defaults", config_path.display());
            }
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Reject settings that cannot produce a sensible image.
    pub fn validate(&self) -> Result<()> {
        let ratio = self.overlay.signature_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            bail!("Signature size must be in (0, 1], got {ratio}");
        }
        if !(0.0..=1.0).contains(&self.overlay.opacity) {
            bail!("Opacity must be in [0, 1], got {}", self.overlay.opacity);
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            bail!("JPEG quality must be in 1..=100, got {}", self.output.jpeg_quality);
        }
        if self.output.suffix.is_empty() {
            bail!("Output suffix must not be empty");
        }
        if self.overlay.reference_width == 0 {
            bail!("Caption reference width must be positive");
        }
        Ok(())
    }

    /// The directory assets are resolved against.
    pub fn asset_dir(&self) -> Result<PathBuf> {
        match &self.assets.directory {
            Some(dir) => Ok(dir.clone()),
            None => executable_dir(),
        }
    }

    /// Resolve an asset file name against [`Config::asset_dir`].
    pub fn asset_path(&self, file: &str) -> Result<PathBuf> {
        Ok(self.asset_dir()?.join(file))
    }
}

fn executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("Failed to get executable path")?;
    let exe_dir = exe_path
        .parent()
        .context("Failed to get executable directory")?;
    Ok(exe_dir.to_path_buf())
}
