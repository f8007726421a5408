//! RAW Caption Tools Library
//!
//! Two small photo workflows built around camera RAW files:
//!
//! - `convert` develops a batch of RAW files into JPEGs.
//! - `caption` asks an external vision model for tags, a caption and a short
//!   write-up for one RAW photo, then lets the user accept, edit or
//!   regenerate the text before it is saved.
//!
//! # Architecture
//!
//! - [`core`] - Configuration and error types
//! - [`convert`] - RAW decoding, development, JPEG encoding and batch conversion
//! - [`caption`] - Prompt, model/editor collaborators and the review session
//! - [`cli`] - Argument parsing, logging and console output for the binaries
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use raw_caption_tools::convert::batch::{BatchConverter, BatchOptions};
//! use raw_caption_tools::convert::{expand_patterns, RawConverter};
//! use raw_caption_tools::core::config::Config;
//! use std::path::Path;
//! use std::sync::atomic::AtomicBool;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default()?;
//!     let converter = RawConverter::from_config(&config);
//!
//!     let inputs = expand_patterns(&["shoot/*.NEF"]);
//!     let report = BatchConverter::new(&converter, BatchOptions::from(&config.convert))
//!         .run(&inputs, Path::new("jpegs"), &AtomicBool::new(false))?;
//!
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! # Testing Without a Model
//!
//! The caption session talks to its collaborators through the
//! [`caption::Captioner`], [`caption::TextEditor`], [`caption::DirectiveSource`]
//! and [`convert::JpegRenderer`] traits, so the whole review loop can be
//! driven by scripted implementations.

pub mod caption;
pub mod cli;
pub mod convert;
pub mod core;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
