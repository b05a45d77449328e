//! Image metadata extraction.
//!
//! Each field comes from one of two places:
//!
//! - **Codec header** (via [`ImageBackend::identify`]): pixel dimensions,
//!   color mode and container format. The color mode is whatever the
//!   decoder reports for the pixel data, so an opaque PNG reads `RGB` and a
//!   PNG with an alpha channel reads `RGBA` regardless of extension.
//!
//! - **Filesystem** (via `std::fs::metadata`): byte size, creation and
//!   modification time. Creation time is optional because several Linux
//!   filesystems and older kernels do not expose it.
//!
//! Every call re-reads the file. Nothing is cached, so the snapshot always
//! reflects the disk at the moment of the call.

use crate::imaging::ImageBackend;
use crate::types::{FileSize, ImageMetadata, OpError};
use crate::validate::has_supported_extension;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const OP: &str = "read metadata";

fn local_time(time: std::io::Result<SystemTime>) -> Option<DateTime<Local>> {
    time.ok().map(DateTime::<Local>::from)
}

fn parent_dir(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Read a fresh [`ImageMetadata`] snapshot for `path`.
///
/// Fails with `NotFound` before anything else is attempted when the file
/// is missing, `UnsupportedFormat` for extensions outside the supported
/// set, `InvalidImage` when the header cannot be decoded, and `Io` for
/// permission or read errors.
pub fn get_image_info(backend: &impl ImageBackend, path: &Path) -> Result<ImageMetadata, OpError> {
    if !path.is_file() {
        return Err(OpError::NotFound(path.to_path_buf()));
    }
    if !has_supported_extension(path) {
        return Err(OpError::unsupported(path));
    }

    let fs_meta = std::fs::metadata(path).map_err(|e| OpError::io(OP, path, e))?;
    let header = backend
        .identify(path)
        .map_err(|e| OpError::from_backend(OP, path, e))?;

    log::debug!(
        "{OP} {}: {}x{} {} {}",
        path.display(),
        header.dimensions.width,
        header.dimensions.height,
        header.format,
        header.color_mode
    );

    Ok(ImageMetadata {
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        directory: parent_dir(path),
        size: FileSize::from_bytes(fs_meta.len()),
        width: header.dimensions.width,
        height: header.dimensions.height,
        format: header.format,
        color_mode: header.color_mode,
        created_at: local_time(fs_meta.created()),
        modified_at: local_time(fs_meta.modified()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::{ColorMode, Container, Dimensions, ImageHeader, RustBackend};
    use crate::test_helpers::*;
    use crate::types::ErrorKind;
    use image::{RgbImage, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn png_100x50_of_2048_bytes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sample.png");
        RgbImage::from_pixel(100, 50, image::Rgb([90, 140, 30]))
            .save(&path)
            .unwrap();
        pad_to(&path, 2048);

        let info = get_image_info(&RustBackend::new(), &path).unwrap();
        assert_eq!(info.width, 100);
        assert_eq!(info.height, 50);
        assert_eq!(info.size.bytes, 2048);
        assert_eq!(info.size.kb, 2.0);
        assert_eq!(info.size.mb, 0.0);
        assert_eq!(info.format, Container::Png);
        assert_eq!(info.color_mode, ColorMode::Rgb);
        assert_eq!(info.filename, "sample.png");
        assert_eq!(info.resolution(), "100 x 50");
    }

    #[test]
    fn directory_is_parent_of_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_png(tmp.path(), "a.png", 4, 4);

        let info = get_image_info(&RustBackend::new(), &path).unwrap();
        assert_eq!(
            info.directory.canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn modification_time_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = write_png(tmp.path(), "a.png", 4, 4);
        let info = get_image_info(&RustBackend::new(), &path).unwrap();
        assert!(info.modified_at.is_some());
    }

    #[test]
    fn alpha_png_reports_rgba() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("alpha.png");
        RgbaImage::from_pixel(3, 3, image::Rgba([0, 0, 0, 10]))
            .save(&path)
            .unwrap();

        let info = get_image_info(&RustBackend::new(), &path).unwrap();
        assert_eq!(info.color_mode, ColorMode::Rgba);
    }

    #[test]
    fn jpeg_reports_rgb_and_webp_is_readable() {
        let tmp = TempDir::new().unwrap();
        let jpg = write_image(&tmp.path().join("a.jpeg"), 10, 20);
        let webp = write_image(&tmp.path().join("a.webp"), 7, 9);
        let backend = RustBackend::new();

        let info = get_image_info(&backend, &jpg).unwrap();
        assert_eq!(info.format, Container::Jpeg);
        assert_eq!(info.color_mode, ColorMode::Rgb);

        let info = get_image_info(&backend, &webp).unwrap();
        assert_eq!(info.format, Container::Webp);
        assert_eq!((info.width, info.height), (7, 9));
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let err = get_image_info(&backend, &tmp.path().join("nope.png")).unwrap_err();
        assert!(err.is_not_found());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_garbage(tmp.path(), "doc.pdf");
        let err = get_image_info(&RustBackend::new(), &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn corrupt_image_is_invalid_not_a_panic() {
        let tmp = TempDir::new().unwrap();
        let path = write_garbage(tmp.path(), "broken.png");
        let err = get_image_info(&RustBackend::new(), &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidImage);
    }

    #[test]
    fn every_call_rereads_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_png(tmp.path(), "a.png", 10, 10);
        let backend = RustBackend::new();

        assert_eq!(get_image_info(&backend, &path).unwrap().width, 10);
        write_png(tmp.path(), "a.png", 30, 10);
        assert_eq!(get_image_info(&backend, &path).unwrap().width, 30);
    }

    #[test]
    fn header_comes_from_backend() {
        let tmp = TempDir::new().unwrap();
        let path = write_garbage(tmp.path(), "fake.gif");
        let backend = MockBackend::with_header(ImageHeader {
            dimensions: Dimensions {
                width: 640,
                height: 480,
            },
            color_mode: ColorMode::Rgba,
            format: Container::Gif,
        });

        let info = get_image_info(&backend, &path).unwrap();
        assert_eq!((info.width, info.height), (640, 480));
        assert_eq!(info.format, Container::Gif);
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Identify(path.to_string_lossy().to_string())]
        );
    }

    #[test]
    fn metadata_serializes_to_json() {
        let tmp = TempDir::new().unwrap();
        let path = write_png(tmp.path(), "a.png", 2, 3);
        let info = get_image_info(&RustBackend::new(), &path).unwrap();

        let json: serde_json::Value = serde_json::to_value(&info).unwrap();
        assert_eq!(json["width"], 2);
        assert_eq!(json["height"], 3);
        assert_eq!(json["format"], "PNG");
        assert_eq!(json["color_mode"], "RGB");
        assert!(json["size"]["kb"].is_number());
    }
}
