//! Command-line argument definitions
//!
//! This module defines the arguments of both binaries using clap.

use clap::Parser;
use std::path::PathBuf;

/// Convert camera RAW files to JPEG
#[derive(Parser, Debug)]
#[command(name = "convert")]
#[command(version)]
#[command(
    about = "Convert camera RAW files to JPEG",
    long_about = "Convert camera RAW files to JPEG.\n\n\
                  Wildcards are expanded even when the shell doesn't do it (cmd.exe), \
                  so `convert out C:\\raws\\*.NEF` works everywhere."
)]
pub struct ConvertArgs {
    /// Directory the JPEG files are written to (created if missing)
    #[arg(required_unless_present = "generate_config")]
    pub output_dir: Option<PathBuf>,

    /// RAW files or wildcard patterns such as "*.NEF"
    #[arg(required_unless_present = "generate_config", num_args = 1..)]
    pub inputs: Vec<String>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// JPEG quality 1-100 (overrides config)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Skip inputs whose JPEG already exists (overrides config)
    #[arg(long)]
    pub skip_existing: bool,

    /// Stop at the first file that fails to convert
    #[arg(long)]
    pub fail_fast: bool,

    /// Write a commented default config file to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub generate_config: Option<PathBuf>,
}

/// Generate tags and a caption for a RAW photo and review them before saving
#[derive(Parser, Debug)]
#[command(name = "caption")]
#[command(version)]
#[command(about = "Generate and review AI tags and captions for a RAW photo", long_about = None)]
pub struct CaptionArgs {
    /// RAW file to caption
    #[arg(required_unless_present = "generate_config")]
    pub raw_file: Option<PathBuf>,

    /// Text file the accepted output is written to
    #[arg(required_unless_present = "generate_config")]
    pub output_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Write a commented default config file to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub generate_config: Option<PathBuf>,
}
