//! CLI support shared by the `convert` and `caption` binaries
//!
//! # Submodules
//!
//! - `args` - Command-line argument definitions using clap
//! - `logging` - env_logger setup, optionally mirrored to a file
//! - `progress` - Console output helpers

pub mod args;
pub mod logging;
pub mod progress;

pub use args::{CaptionArgs, ConvertArgs};
pub use logging::init_logging;
pub use progress::DualWriter;

use crate::core::config::Config;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Load configuration for a binary, falling back to defaults when it can't be read
///
/// Logging isn't initialised yet at this point, so problems go straight to stderr.
pub fn load_config(explicit: Option<&Path>) -> Config {
    match Config::resolve(explicit) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Config::default()
        }
    }
}

/// Write the commented default configuration to `output_path`
pub fn generate_config_file(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    fs::write(output_path, Config::generate_default_config())
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!("Configuration file: {}", output_path.display());
    info!("Edit this file to customize the conversion and caption settings.");
    Ok(())
}
