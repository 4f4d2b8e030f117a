//! # Image Codec Boundary
//!
//! Thin wrapper over the `image` crate that converts between image files and
//! [`PixelBuffer`]s. Everything past this module works on normalized RGB8 data
//! with no row padding, whatever the source format was.

use image::RgbImage;
use log::{debug, error, info};
use std::path::Path;

use crate::common::pixels::PixelBuffer;
use crate::error::{Error, Result};

/// Load an image file and normalize it to an RGB8 pixel buffer.
///
/// Any format the `image` crate can decode is accepted; alpha is dropped and
/// palette or grayscale images are expanded to RGB.
///
/// # Errors
/// - [`Error::ImageLoad`] if the file is missing, unreadable or undecodable
pub fn load<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    debug!("Loaded '{}' ({}x{})", path.display(), width, height);

    PixelBuffer::new(width, height, rgb.into_raw())
}

/// Encode a pixel buffer and write it to `path`.
///
/// The output format is picked from the file extension (`.bmp` writes BMP).
///
/// # Errors
/// - [`Error::ImageSave`] if the encoder rejects the data or the write fails
pub fn save<P: AsRef<Path>>(path: P, pixels: &PixelBuffer) -> Result<()> {
    let path = path.as_ref();

    let img = RgbImage::from_raw(pixels.width(), pixels.height(), pixels.as_bytes().to_vec())
        .ok_or_else(|| Error::ImageSave {
            path: path.to_path_buf(),
            reason: "pixel data does not match image dimensions".to_string(),
        })?;

    if let Err(e) = img.save(path) {
        error!("❌ Could not save image '{}': {}", path.display(), e);
        return Err(Error::ImageSave {
            path: path.to_path_buf(),
            reason: e.to_string(),
        });
    }

    info!("💾 Saved image as '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_bmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.bmp");

        let pixels = PixelBuffer::new(2, 2, (0..12).map(|v| v * 20).collect()).unwrap();
        save(&path, &pixels).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, pixels);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(dir.path().join("missing.bmp"));

        assert!(matches!(result, Err(Error::ImageLoad { .. })));
    }

    #[test]
    fn test_save_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let pixels = PixelBuffer::new(1, 1, vec![1, 2, 3]).unwrap();

        let result = save(dir.path().join("no/such/dir/out.bmp"), &pixels);
        assert!(matches!(result, Err(Error::ImageSave { .. })));
    }
}
