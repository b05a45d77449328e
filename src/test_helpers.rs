//! Shared test utilities for the photo-porter test suite.
//!
//! Provides synthetic image writers and directory listing helpers so tests
//! can build a scratch folder, run an operation, and assert on exactly
//! which files exist afterwards.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let photo = write_png(tmp.path(), "photo.png", 100, 50);
//! move_image(&photo, &dest).unwrap();
//! assert_eq!(file_names(&dest), vec!["photo.png"]);
//! ```

use image::{DynamicImage, ImageFormat, RgbImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Synthetic images
// =========================================================================

/// Colorful gradient so grayscale conversion has something to do.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 200])
    }))
}

/// Write a gradient image at `path`, format taken from the extension.
pub fn write_image(path: &Path, width: u32, height: u32) -> PathBuf {
    let format = ImageFormat::from_path(path).unwrap();
    gradient(width, height)
        .save_with_format(path, format)
        .unwrap();
    path.to_path_buf()
}

/// Write a gradient PNG named `name` inside `dir`.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    write_image(&dir.join(name), width, height)
}

/// Write a file with an image extension whose content is not an image.
pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not an image at all").unwrap();
    path
}

/// Append zero bytes after the image data until the file is `len` bytes.
///
/// Header-only readers ignore trailing bytes, so the dimensions survive.
pub fn pad_to(path: &Path, len: u64) {
    let current = std::fs::metadata(path).unwrap().len();
    assert!(current <= len, "{} is already {current} bytes", path.display());
    let mut bytes = std::fs::read(path).unwrap();
    bytes.resize(len as usize, 0);
    std::fs::write(path, bytes).unwrap();
}

// =========================================================================
// Directory assertions
// =========================================================================

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
