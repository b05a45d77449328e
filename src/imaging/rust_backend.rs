//! Pure Rust codec backend on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::with_guessed_format` + `ImageDecoder::{dimensions, color_type}` |
//! | Verify / open | `ImageReader::decode` |
//! | Grayscale | `DynamicImage::to_luma8` (Rec. 709 luma weights) |
//! | Save | `DynamicImage::save_with_format` |
//!
//! Format detection sniffs the magic bytes, so a PNG saved as `photo.jpg`
//! identifies as PNG.

use super::backend::{BackendError, ColorMode, Container, Dimensions, ImageBackend, ImageHeader};
use image::{ColorType, DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

/// Split `image` errors into I/O (permissions, vanished files) and everything else.
fn map_decode_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(e) => BackendError::Io(e),
        ImageError::Unsupported(e) => {
            BackendError::Unsupported(format!("{}: {}", path.display(), e))
        }
        other => BackendError::Decode(format!("Failed to decode {}: {}", path.display(), other)),
    }
}

fn map_encode_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(e) => BackendError::Io(e),
        other => BackendError::Encode(format!("Failed to write {}: {}", path.display(), other)),
    }
}

fn container_of(format: ImageFormat) -> Option<Container> {
    match format {
        ImageFormat::Png => Some(Container::Png),
        ImageFormat::Jpeg => Some(Container::Jpeg),
        ImageFormat::Bmp => Some(Container::Bmp),
        ImageFormat::Tiff => Some(Container::Tiff),
        ImageFormat::Gif => Some(Container::Gif),
        ImageFormat::WebP => Some(Container::Webp),
        _ => None,
    }
}

fn image_format(container: Container) -> ImageFormat {
    match container {
        Container::Png => ImageFormat::Png,
        Container::Jpeg => ImageFormat::Jpeg,
        Container::Bmp => ImageFormat::Bmp,
        Container::Tiff => ImageFormat::Tiff,
        Container::Gif => ImageFormat::Gif,
        Container::Webp => ImageFormat::WebP,
    }
}

fn color_mode_of(color: ColorType) -> Option<ColorMode> {
    match color {
        ColorType::L8 => Some(ColorMode::L),
        ColorType::La8 => Some(ColorMode::La),
        ColorType::Rgb8 => Some(ColorMode::Rgb),
        ColorType::Rgba8 => Some(ColorMode::Rgba),
        ColorType::L16 => Some(ColorMode::L16),
        ColorType::La16 => Some(ColorMode::La16),
        ColorType::Rgb16 => Some(ColorMode::Rgb16),
        ColorType::Rgba16 => Some(ColorMode::Rgba16),
        ColorType::Rgb32F => Some(ColorMode::Rgb32F),
        ColorType::Rgba32F => Some(ColorMode::Rgba32F),
        _ => None,
    }
}

/// The GIF encoder only takes RGB(A) buffers.
fn prepare_for(image: &DynamicImage, container: Container) -> Cow<'_, DynamicImage> {
    match (container, image) {
        (Container::Gif, DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) => {
            Cow::Borrowed(image)
        }
        (Container::Gif, other) => Cow::Owned(DynamicImage::ImageRgba8(other.to_rgba8())),
        _ => Cow::Borrowed(image),
    }
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn identify(&self, path: &Path) -> Result<ImageHeader, BackendError> {
        let reader = open_reader(path)?;
        let format = reader
            .format()
            .and_then(container_of)
            .ok_or_else(|| {
                BackendError::Unsupported(format!(
                    "{}: unrecognized image data",
                    path.display()
                ))
            })?;
        let decoder = reader
            .into_decoder()
            .map_err(|e| map_decode_error(path, e))?;
        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();
        let color_mode = color_mode_of(color_type).ok_or_else(|| {
            BackendError::Unsupported(format!("{}: color type {:?}", path.display(), color_type))
        })?;
        Ok(ImageHeader {
            dimensions: Dimensions { width, height },
            color_mode,
            format,
        })
    }

    fn verify(&self, path: &Path) -> Result<(), BackendError> {
        self.open(path).map(|_| ())
    }

    fn open(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        open_reader(path)?
            .decode()
            .map_err(|e| map_decode_error(path, e))
    }

    fn to_grayscale(&self, image: DynamicImage) -> DynamicImage {
        DynamicImage::ImageLuma8(image.to_luma8())
    }

    fn save(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: Container,
    ) -> Result<(), BackendError> {
        prepare_for(image, format)
            .save_with_format(path, image_format(format))
            .map_err(|e| map_encode_error(path, e))
    }
}
