//! RAW to JPEG batch converter - CLI Entry Point
//!
//! Thin wrapper around the library: argument parsing, logging setup,
//! wildcard expansion and the batch run.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use raw_caption_tools::cli::{self, progress, ConvertArgs};
use raw_caption_tools::convert::batch::{BatchConverter, BatchOptions};
use raw_caption_tools::convert::{expand_patterns, RawConverter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> Result<()> {
    let args = ConvertArgs::parse();

    let mut config = cli::load_config(args.config.as_deref());

    // Apply CLI overrides to config
    if let Some(quality) = args.quality {
        config.convert.jpeg_quality = quality;
    }
    if args.skip_existing {
        config.convert.skip_existing = true;
    }
    if args.fail_fast {
        config.convert.continue_on_error = false;
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    cli::init_logging(&config.logging)?;

    if let Some(ref path) = args.generate_config {
        return cli::generate_config_file(path);
    }
    let output_dir = args
        .output_dir
        .context("An output directory is required")?;

    // Set up graceful shutdown handler
    let shutdown_flag = Arc::new(AtomicBool::new(false));
    let shutdown_flag_clone = shutdown_flag.clone();

    ctrlc::set_handler(move || {
        if shutdown_flag_clone.load(Ordering::SeqCst) {
            eprintln!("\nForce shutdown requested. Exiting immediately...");
            std::process::exit(1);
        } else {
            shutdown_flag_clone.store(true, Ordering::SeqCst);
            eprintln!("\nGraceful shutdown requested. Finishing current file... (Press Ctrl+C again to force quit)");
        }
    })
    .context("Failed to set Ctrl+C handler")?;

    info!("{} v{} (convert)", raw_caption_tools::NAME, raw_caption_tools::VERSION);

    let inputs = expand_patterns(&args.inputs);
    debug!("Inputs after wildcard expansion: {:?}", inputs);
    info!(
        "Converting {} file(s) into {}",
        inputs.len(),
        output_dir.display()
    );

    let converter = RawConverter::from_config(&config);
    let report = BatchConverter::new(&converter, BatchOptions::from(&config.convert))
        .with_progress(true)
        .run(&inputs, &output_dir, &shutdown_flag)?;

    progress::print_batch_summary(&report);

    if report.has_failures() || report.interrupted {
        std::process::exit(1);
    }

    Ok(())
}
