//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the narrow seam between the file operations
//! and whatever library actually decodes and encodes pixels. It exposes five
//! operations: identify, verify, open, to_grayscale and save.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) on top of the `image`
//! crate. Nothing outside `imaging` names a codec type, so a different
//! library can be dropped in without touching the operation contracts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported format: {0}")]
    Unsupported(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Channel layout of decoded pixels, as reported by the codec.
///
/// Names follow the usual short notation: `L` is luminance, `A` alpha,
/// a numeric suffix the bits per channel when it is not 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    #[serde(rename = "L")]
    L,
    #[serde(rename = "LA")]
    La,
    #[serde(rename = "RGB")]
    Rgb,
    #[serde(rename = "RGBA")]
    Rgba,
    #[serde(rename = "L16")]
    L16,
    #[serde(rename = "LA16")]
    La16,
    #[serde(rename = "RGB16")]
    Rgb16,
    #[serde(rename = "RGBA16")]
    Rgba16,
    #[serde(rename = "RGB32F")]
    Rgb32F,
    #[serde(rename = "RGBA32F")]
    Rgba32F,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::L => "L",
            ColorMode::La => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
            ColorMode::L16 => "L16",
            ColorMode::La16 => "LA16",
            ColorMode::Rgb16 => "RGB16",
            ColorMode::Rgba16 => "RGBA16",
            ColorMode::Rgb32F => "RGB32F",
            ColorMode::Rgba32F => "RGBA32F",
        }
    }

    /// True for a lone luminance channel (no alpha).
    pub fn is_single_channel(self) -> bool {
        matches!(self, ColorMode::L | ColorMode::L16)
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container formats the backends are expected to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Container {
    Png,
    Jpeg,
    Bmp,
    Tiff,
    Gif,
    Webp,
}

impl Container {
    /// Map a file extension (without dot, any case) to its container.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Container::Png),
            "jpg" | "jpeg" => Some(Container::Jpeg),
            "bmp" => Some(Container::Bmp),
            "tiff" => Some(Container::Tiff),
            "gif" => Some(Container::Gif),
            "webp" => Some(Container::Webp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Container::Png => "PNG",
            Container::Jpeg => "JPEG",
            Container::Bmp => "BMP",
            Container::Tiff => "TIFF",
            Container::Gif => "GIF",
            Container::Webp => "WEBP",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an identify operation: everything the header tells us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub dimensions: Dimensions,
    pub color_mode: ColorMode,
    /// Detected from file content, not from the extension.
    pub format: Container,
}

/// Trait for image codec backends.
///
/// `identify` must not decode pixel data; `verify` must decode enough to
/// catch a corrupt file. `save` writes exactly one file at `path`.
pub trait ImageBackend: Send + Sync {
    /// Decoded pixels, opaque to callers.
    type Image;

    /// Read dimensions, color mode and container format from the header.
    fn identify(&self, path: &Path) -> Result<ImageHeader, BackendError>;

    /// Structural decode check. Pixels are discarded.
    fn verify(&self, path: &Path) -> Result<(), BackendError>;

    /// Fully decode an image.
    fn open(&self, path: &Path) -> Result<Self::Image, BackendError>;

    /// Luminance transform to a single channel.
    fn to_grayscale(&self, image: Self::Image) -> Self::Image;

    /// Encode `image` as `format` and write it to `path`.
    fn save(&self, image: &Self::Image, path: &Path, format: Container)
    -> Result<(), BackendError>;
}
