//! Batch conversion
//!
//! Converts a list of RAW files into one output directory, one JPEG per input,
//! with a progress bar and a summary of what happened.

use crate::convert::{jpeg_output_path, JpegRenderer};
use crate::core::config::ConvertConfig;
use crate::core::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Options for a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Skip inputs whose JPEG already exists
    pub skip_existing: bool,
    /// Keep going after a failed file instead of aborting the batch
    pub continue_on_error: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            skip_existing: false,
            continue_on_error: true,
        }
    }
}

impl From<&ConvertConfig> for BatchOptions {
    fn from(config: &ConvertConfig) -> Self {
        Self {
            skip_existing: config.skip_existing,
            continue_on_error: config.continue_on_error,
        }
    }
}

/// What happened during a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// (input, output) pairs that were written
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// Inputs skipped because their output already existed
    pub skipped: Vec<PathBuf>,
    /// Inputs that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
    /// The run stopped early because of a shutdown request
    pub interrupted: bool,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Converted: {}, Skipped: {}, Failed: {}",
            self.converted.len(),
            self.skipped.len(),
            self.failed.len()
        )?;
        if self.interrupted {
            write!(f, " (interrupted)")?;
        }
        Ok(())
    }
}

/// Drives a [`JpegRenderer`] over many inputs
pub struct BatchConverter<'a, R: JpegRenderer> {
    renderer: &'a R,
    options: BatchOptions,
    show_progress: bool,
}

impl<'a, R: JpegRenderer> BatchConverter<'a, R> {
    pub fn new(renderer: &'a R, options: BatchOptions) -> Self {
        Self {
            renderer,
            options,
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while converting
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Convert every input into `output_dir`.
    ///
    /// The shutdown flag is checked between files. With `continue_on_error`
    /// off, the first failure is returned as the error.
    pub fn run(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
        shutdown_flag: &AtomicBool,
    ) -> Result<BatchReport> {
        fs::create_dir_all(output_dir)?;

        let progress = if self.show_progress {
            let bar = ProgressBar::new(inputs.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                    .expect("Invalid progress template")
                    .progress_chars("#>-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut report = BatchReport::default();
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for (index, input) in inputs.iter().enumerate() {
            if shutdown_flag.load(Ordering::SeqCst) {
                progress.suspend(|| warn!("Shutdown requested, stopping conversion..."));
                report.interrupted = true;
                break;
            }

            progress.set_position(index as u64);
            let display_name: String = input
                .file_name()
                .map(|n| n.to_string_lossy().chars().take(30).collect())
                .unwrap_or_default();
            progress.set_message(display_name);

            let output = jpeg_output_path(input, output_dir);
            if !claimed.insert(output.clone()) {
                progress.suspend(|| {
                    warn!(
                        "{} maps to {} which an earlier input already wrote; it will be overwritten",
                        input.display(),
                        output.display()
                    )
                });
            }

            if self.options.skip_existing && output.exists() {
                progress.suspend(|| info!("Skipping {} (already converted)", input.display()));
                report.skipped.push(input.clone());
                continue;
            }

            progress.suspend(|| {
                info!("Converting {} to {}", input.display(), output.display())
            });

            match self.renderer.render(input, &output) {
                Ok(()) => report.converted.push((input.clone(), output)),
                Err(e) => {
                    if !self.options.continue_on_error {
                        progress.abandon_with_message("Conversion aborted");
                        return Err(e);
                    }
                    progress.suspend(|| error!("Failed to convert {}: {}", input.display(), e));
                    report.failed.push((input.clone(), e.to_string()));
                }
            }
        }

        if report.interrupted {
            progress.abandon_with_message("Conversion interrupted!");
        } else {
            progress.set_position(inputs.len() as u64);
            progress.finish_with_message("Conversion complete!");
        }

        Ok(report)
    }
}
