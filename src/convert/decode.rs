//! RAW decoding and development via LibRaw
//!
//! LibRaw does the whole develop step (demosaic, white balance, colour
//! conversion, auto-brightness, gamma and orientation) with its default
//! parameters. We only turn its 16-bit output into an 8-bit raster.

use crate::core::config::DevelopConfig;
use crate::core::error::{Result, ToolError};
use image::RgbImage;
use log::debug;
use std::path::Path;

/// The LibRaw processing parameters that can be configured.
///
/// Defaults are LibRaw's own, so an untouched config develops exactly like
/// LibRaw with no parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevelopOptions {
    /// Brighten so the top 1% of pixels clip to white
    pub auto_bright: bool,
    /// Brightness multiplier
    pub brightness: f32,
    /// Use the white balance recorded by the camera
    pub use_camera_wb: bool,
}

impl Default for DevelopOptions {
    fn default() -> Self {
        Self {
            auto_bright: true,
            brightness: 1.0,
            use_camera_wb: false,
        }
    }
}

impl From<&DevelopConfig> for DevelopOptions {
    fn from(config: &DevelopConfig) -> Self {
        Self {
            auto_bright: config.auto_bright,
            brightness: config.brightness,
            use_camera_wb: config.use_camera_wb,
        }
    }
}

/// Decode and develop a RAW file into an 8-bit RGB raster
pub fn decode_raw(path: &Path, options: &DevelopOptions) -> Result<RgbImage> {
    use rsraw::{RawImage, BIT_DEPTH_16};

    debug!("Decoding RAW file: {}", path.display());

    let decode_error = |message: String| ToolError::RawDecode {
        path: path.to_path_buf(),
        message,
    };

    let data = std::fs::read(path)
        .map_err(|e| decode_error(format!("Failed to read RAW file: {}", e)))?;

    let mut raw = RawImage::open(&data)
        .map_err(|e| decode_error(format!("Failed to open RAW file: {:?}", e)))?;

    {
        let libraw_data: &mut rsraw_sys::libraw_data_t = raw.as_mut();
        libraw_data.params.no_auto_bright = i32::from(!options.auto_bright);
        libraw_data.params.bright = options.brightness;
        libraw_data.params.use_camera_wb = i32::from(options.use_camera_wb);
    }

    raw.unpack()
        .map_err(|e| decode_error(format!("Failed to unpack RAW data: {:?}", e)))?;

    let processed = raw
        .process::<BIT_DEPTH_16>()
        .map_err(|e| decode_error(format!("Failed to process RAW: {:?}", e)))?;

    let width = processed.width();
    let height = processed.height();
    let channels = processed.colors() as usize;
    debug!(
        "Developed {}: {}x{}, {} channel(s)",
        path.display(),
        width,
        height,
        channels
    );

    let pixels: &[u16] = &processed;
    to_rgb8(pixels, width, height, channels).map_err(|reason| ToolError::UnsupportedRaw {
        path: path.to_path_buf(),
        reason,
    })
}

/// Convert LibRaw's 16-bit output (RGB, RGBA or grey) to an 8-bit RGB raster
fn to_rgb8(
    pixels: &[u16],
    width: u32,
    height: u32,
    channels: usize,
) -> std::result::Result<RgbImage, String> {
    let pixel_count = width as usize * height as usize;
    if pixel_count == 0 {
        return Err(format!("empty image ({}x{})", width, height));
    }
    if !matches!(channels, 1 | 3 | 4) {
        return Err(format!("unexpected channel count {}", channels));
    }

    let expected = pixel_count * channels;
    if pixels.len() < expected {
        return Err(format!(
            "buffer size mismatch: expected at least {}, got {}",
            expected,
            pixels.len()
        ));
    }

    let to_u8 = |v: u16| (v >> 8) as u8;
    let buffer: Vec<u8> = match channels {
        1 => pixels[..expected]
            .iter()
            .flat_map(|&grey| [to_u8(grey); 3])
            .collect(),
        _ => pixels[..expected]
            .chunks_exact(channels)
            .flat_map(|px| [to_u8(px[0]), to_u8(px[1]), to_u8(px[2])])
            .collect(),
    };

    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| format!("could not build a {}x{} raster", width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rgb_output_scaled_to_8_bit() {
        let pixels = [0xFFFF, 0x8000, 0x00FF, 0x1234, 0xABCD, 0x0000];
        let image = to_rgb8(&pixels, 2, 1, 3).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0xFF, 0x80, 0x00]);
        assert_eq!(image.get_pixel(1, 0).0, [0x12, 0xAB, 0x00]);
    }

    #[test]
    fn test_alpha_channel_dropped() {
        let pixels = [0x1000, 0x2000, 0x3000, 0xFFFF];
        let image = to_rgb8(&pixels, 1, 1, 4).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_grey_expanded_to_rgb() {
        let image = to_rgb8(&[0x4000, 0xFF00], 1, 2, 1).unwrap();
        assert_eq!(image.dimensions(), (1, 2));
        assert_eq!(image.get_pixel(0, 0).0, [0x40; 3]);
        assert_eq!(image.get_pixel(0, 1).0, [0xFF; 3]);
    }

    #[test]
    fn test_truncated_buffer_rejected() {
        let err = to_rgb8(&[0; 5], 2, 1, 3).unwrap_err();
        assert!(err.contains("expected at least 6"));
    }

    #[test]
    fn test_unexpected_layout_rejected() {
        assert!(to_rgb8(&[0; 4], 2, 1, 2).is_err());
        assert!(to_rgb8(&[], 0, 0, 3).is_err());
    }

    #[test]
    fn test_defaults_are_libraw_defaults() {
        let options = DevelopOptions::default();
        assert!(options.auto_bright);
        assert_eq!(options.brightness, 1.0);
        assert!(!options.use_camera_wb);
        assert_eq!(DevelopOptions::from(&DevelopConfig::default()), options);
    }

    #[test]
    fn test_decode_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = decode_raw(&temp_dir.path().join("missing.NEF"), &DevelopOptions::default())
            .unwrap_err();
        match err {
            ToolError::RawDecode { path, .. } => assert!(path.ends_with("missing.NEF")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_non_raw_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.NEF");
        std::fs::write(&path, b"definitely not a camera file").unwrap();

        let err = decode_raw(&path, &DevelopOptions::default()).unwrap_err();
        assert!(matches!(err, ToolError::RawDecode { .. }));
    }
}
