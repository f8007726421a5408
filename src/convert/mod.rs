//! RAW to JPEG conversion
//!
//! Decodes camera RAW files with LibRaw's default processing and writes JPEG
//! files. The batch driver lives in [`batch`].
//!
//! # Submodules
//!
//! - `decode` - RAW decoding and development via LibRaw
//! - `batch` - Converting many files into one output directory

pub mod batch;
pub mod decode;

use crate::core::config::Config;
use crate::core::error::{Result, ToolError};
use decode::DevelopOptions;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Anything that can turn a RAW file into a JPEG on disk
pub trait JpegRenderer {
    /// Render `raw` to a JPEG at `jpeg`, creating parent directories as needed
    fn render(&self, raw: &Path, jpeg: &Path) -> Result<()>;
}

/// Converts RAW files to JPEG with LibRaw
#[derive(Debug, Clone)]
pub struct RawConverter {
    options: DevelopOptions,
    quality: u8,
}

impl RawConverter {
    pub fn new(options: DevelopOptions, quality: u8) -> Self {
        Self {
            options,
            quality: quality.clamp(1, 100),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DevelopOptions::from(&config.develop),
            config.convert.jpeg_quality,
        )
    }

    /// Decode and develop `raw`, then write it to `jpeg`.
    ///
    /// Returns the dimensions of the written image.
    pub fn convert(&self, raw: &Path, jpeg: &Path) -> Result<(u32, u32)> {
        let image = decode::decode_raw(raw, &self.options)?;
        write_jpeg(&image, jpeg, self.quality)?;
        debug!(
            "Wrote {} ({}x{})",
            jpeg.display(),
            image.width(),
            image.height()
        );
        Ok(image.dimensions())
    }
}

impl Default for RawConverter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl JpegRenderer for RawConverter {
    fn render(&self, raw: &Path, jpeg: &Path) -> Result<()> {
        self.convert(raw, jpeg).map(|_| ())
    }
}

/// Encode an RGB raster as a JPEG file, creating parent directories as needed
pub fn write_jpeg(image: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let encode_error = |message: String| ToolError::JpegEncode {
        path: path.to_path_buf(),
        message,
    };

    let file = File::create(path).map_err(|e| encode_error(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| encode_error(e.to_string()))?;
    writer.flush().map_err(|e| encode_error(e.to_string()))?;

    Ok(())
}

/// Output path for `raw` inside `output_dir`: the file stem with a `.jpg` extension
pub fn jpeg_output_path(raw: &Path, output_dir: &Path) -> PathBuf {
    let stem = raw
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| raw.as_os_str().to_os_string());
    let mut name = stem;
    name.push(".jpg");
    output_dir.join(name)
}

/// Expand wildcard arguments into concrete paths.
///
/// Shells like cmd.exe pass `*.NEF` through untouched, so every argument is
/// globbed here. Matches are appended in sorted order; an argument that matches
/// nothing (or isn't a valid pattern) is kept as-is so the decoder reports it.
pub fn expand_patterns<S: AsRef<str>>(args: &[S]) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        let mut matches = match glob::glob(arg) {
            Ok(entries) => entries
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        warn!("Skipping unreadable match for '{}': {}", arg, e);
                        None
                    }
                })
                .collect::<Vec<_>>(),
            Err(e) => {
                debug!("'{}' is not a valid pattern ({}), using it literally", arg, e);
                Vec::new()
            }
        };

        if matches.is_empty() {
            paths.push(PathBuf::from(arg));
        } else {
            matches.sort();
            paths.append(&mut matches);
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"raw").unwrap();
        path
    }

    #[test]
    fn test_jpeg_output_path() {
        let out = Path::new("out");
        assert_eq!(
            jpeg_output_path(Path::new("/photos/DSC_0001.NEF"), out),
            out.join("DSC_0001.jpg")
        );
        assert_eq!(
            jpeg_output_path(Path::new("holiday.v2.CR2"), out),
            out.join("holiday.v2.jpg")
        );
        assert_eq!(
            jpeg_output_path(Path::new("noext"), out),
            out.join("noext.jpg")
        );
    }

    #[test]
    fn test_expand_wildcard_matches_all() {
        let temp_dir = TempDir::new().unwrap();
        let a = touch(temp_dir.path(), "a.NEF");
        let b = touch(temp_dir.path(), "b.NEF");
        touch(temp_dir.path(), "c.CR2");

        let pattern = temp_dir.path().join("*.NEF");
        let expanded = expand_patterns(&[pattern.to_str().unwrap()]);
        assert_eq!(expanded, vec![a, b]);
    }

    #[test]
    fn test_expand_passes_through_unmatched() {
        let temp_dir = TempDir::new().unwrap();
        let literal = temp_dir.path().join("missing.NEF");
        let pattern = temp_dir.path().join("*.ARW");

        let expanded = expand_patterns(&[
            literal.to_str().unwrap().to_string(),
            pattern.to_str().unwrap().to_string(),
        ]);
        assert_eq!(expanded, vec![literal, pattern]);
    }

    #[test]
    fn test_expand_keeps_existing_literal_and_order() {
        let temp_dir = TempDir::new().unwrap();
        let z = touch(temp_dir.path(), "z.NEF");
        let a = touch(temp_dir.path(), "a.NEF");

        let expanded = expand_patterns(&[z.to_str().unwrap(), a.to_str().unwrap()]);
        assert_eq!(expanded, vec![z, a]);
    }

    #[test]
    fn test_expand_invalid_pattern_is_literal() {
        let expanded = expand_patterns(&["photos/[.NEF"]);
        assert_eq!(expanded, vec![PathBuf::from("photos/[.NEF")]);
    }

    #[test]
    fn test_write_jpeg_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deeper").join("out.jpg");
        let image = RgbImage::from_pixel(8, 6, image::Rgb([200, 120, 40]));

        write_jpeg(&image, &path, 90).unwrap();

        let written = fs::read(&path).unwrap();
        assert_eq!(&written[..2], &[0xFF, 0xD8]);
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn test_convert_reports_decode_failure() {
        let temp_dir = TempDir::new().unwrap();
        let converter = RawConverter::default();
        let jpeg = temp_dir.path().join("out.jpg");

        let err = converter
            .render(&temp_dir.path().join("missing.NEF"), &jpeg)
            .unwrap_err();
        assert!(matches!(err, ToolError::RawDecode { .. }));
        assert!(!jpeg.exists());
    }
}
