//! # exif-sig
//!
//! Batch signature watermarking for JPEG photos. Every `*.jpg` under a folder
//! gets a sibling `*-sig.jpg` carrying either a signature overlay with an EXIF
//! caption, or a camera-make footer strip. The original EXIF block is copied
//! into the output untouched.
//!
//! ## Quick Start
//!
//! The pipeline module handles the full read → compose → write flow:
//!
//! ```rust,no_run
//! use exif_sig::composite::CompositeEngine;
//! use exif_sig::config::Config;
//! use exif_sig::pipeline::{collect_images, run_batch, BatchSummary};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Load config (asset directory, signature size, layout mode, ...)
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!     let engine = CompositeEngine::from_config(&config)?;
//!
//!     // Collect *.jpg files, skipping earlier *-sig.jpg outputs
//!     let images = collect_images(Path::new("./photos"), &config.output.suffix);
//!
//!     let results = run_batch(&images, &engine, &config);
//!     let summary = BatchSummary::from_results(&results);
//!     println!("{} written, {} failed", summary.written, summary.failed);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The caption and compositing steps are plain functions:
//!
//! ```rust,no_run
//! use exif_sig::caption::{format_caption, CaptionFields};
//! use exif_sig::exif::read_tags;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let tags = read_tags(Path::new("photo.jpg"))?;
//! let fields = CaptionFields::from_tags(&tags);
//! println!("{}", format_caption(&fields)?);
//! // "X100V + 23mm f2  |  23mm, iso400, f/2.8, 1/250s"
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`caption`] — Caption schema projection and formatting
//! - [`composite`] — Signature overlay and footer layouts
//! - [`config`] — Configuration types and loading/saving
//! - [`error`] — Typed caption and compositing errors
//! - [`exif`] — EXIF tag reading and verbatim EXIF passthrough
//! - [`pipeline`] — Folder walking and per-file processing

pub mod caption;
pub mod composite;
pub mod config;
pub mod error;
pub mod exif;
pub mod pipeline;
