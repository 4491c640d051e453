//! Signature compositing.
//!
//! One [`CompositeEngine`] runs either of the two layouts selected by
//! [`CompositeMode`]:
//!
//! - **Overlay** — the signature is scaled relative to the photo, pinned to the
//!   bottom-left (or bottom-center), the caption is drawn bottom-right, and the
//!   layer is additively blended onto the photo.
//! - **Footer** — a template chosen by camera make is captioned, resized to the
//!   photo's width and stacked underneath it.
//!
//! Assets are loaded per call, so nothing is held between files and a missing
//! asset only fails the files that need it.

pub mod blend;
pub mod footer;
pub mod overlay;
pub mod text;

use ab_glyph::FontVec;
use anyhow::Result;
use image::{DynamicImage, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};

use crate::caption::{self, CaptionFields};
use crate::config::{CompositeMode, Config, FooterConfig, OverlayConfig, TemplateRule};
use crate::error::CompositeError;

/// Resolves and loads the signature, font and footer templates.
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
    signature: String,
    font: String,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>, signature: impl Into<String>, font: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            signature: signature.into(),
            font: font.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.asset_dir()?,
            config.assets.signature.clone(),
            config.assets.font.clone(),
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn signature(&self) -> Result<RgbaImage, CompositeError> {
        self.load_image(&self.signature)
    }

    pub fn font(&self) -> Result<FontVec, CompositeError> {
        text::load_font(&self.dir.join(&self.font))
    }

    pub fn template(&self, rule: &TemplateRule) -> Result<RgbaImage, CompositeError> {
        self.load_image(&rule.file)
    }

    fn load_image(&self, file: &str) -> Result<RgbaImage, CompositeError> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Err(CompositeError::AssetMissing(path));
        }
        Ok(image::open(&path)?.to_rgba8())
    }
}

/// Produces the signed image for one photo.
#[derive(Debug, Clone)]
pub struct CompositeEngine {
    mode: CompositeMode,
    overlay: OverlayConfig,
    footer: FooterConfig,
    assets: AssetStore,
}

impl CompositeEngine {
    pub fn new(mode: CompositeMode, overlay: OverlayConfig, footer: FooterConfig, assets: AssetStore) -> Self {
        Self {
            mode,
            overlay,
            footer,
            assets,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.mode,
            config.overlay.clone(),
            config.footer.clone(),
            AssetStore::from_config(config)?,
        ))
    }

    pub fn mode(&self) -> CompositeMode {
        self.mode
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Check whether this photo can be composed at all, before decoding it.
    ///
    /// Only the footer layout can refuse a photo (no template for its make).
    pub fn check(&self, fields: &CaptionFields) -> Result<(), CompositeError> {
        match self.mode {
            CompositeMode::Overlay => Ok(()),
            CompositeMode::Footer => self.footer_rule(fields).map(|_| ()),
        }
    }

    /// Compose the signed image for `source`.
    pub fn compose(&self, source: &DynamicImage, fields: &CaptionFields) -> Result<RgbImage, CompositeError> {
        match self.mode {
            CompositeMode::Overlay => self.compose_overlay(source, fields),
            CompositeMode::Footer => self.compose_footer(source, fields),
        }
    }

    fn compose_overlay(&self, source: &DynamicImage, fields: &CaptionFields) -> Result<RgbImage, CompositeError> {
        let signature = self.assets.signature()?;

        if !self.overlay.show_caption {
            return Ok(overlay::compose(source, &signature, None, &self.overlay));
        }

        let caption = caption::format_caption(fields)?;
        let font = self.assets.font()?;
        log::debug!("Caption: {caption}");
        Ok(overlay::compose(
            source,
            &signature,
            Some((caption.as_str(), &font)),
            &self.overlay,
        ))
    }

    fn compose_footer(&self, source: &DynamicImage, fields: &CaptionFields) -> Result<RgbImage, CompositeError> {
        let rule = self.footer_rule(fields)?;
        let caption = caption::format_caption(fields)?;
        let font = self.assets.font()?;
        let mut template = self.assets.template(rule)?;
        log::debug!("Footer template {} for {}", rule.file, fields.device_make);

        footer::caption_template(&mut template, &caption, &font, &self.footer);
        Ok(footer::compose(source, &template))
    }

    fn footer_rule(&self, fields: &CaptionFields) -> Result<&TemplateRule, CompositeError> {
        footer::select_template(&fields.device_make, &self.footer.templates).ok_or_else(|| {
            CompositeError::UnsupportedDevice {
                make: fields.device_make.clone(),
            }
        })
    }
}
