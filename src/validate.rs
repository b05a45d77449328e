//! Image validation: the gate every front end passes before acting on a path.
//!
//! Two extension sets exist on purpose:
//!
//! | Set | Extensions | Used by |
//! |---|---|---|
//! | [`SUPPORTED_EXTENSIONS`] | png jpg jpeg bmp tiff gif webp | validation, metadata |
//! | [`CONVERTIBLE_EXTENSIONS`] | png jpg jpeg bmp tiff gif | grayscale conversion |
//!
//! WebP files can be inspected but not converted.
//!
//! Matching is case-insensitive on the extension only. Whether two paths
//! differing in case name the same file is left to the host filesystem.

use crate::imaging::ImageBackend;
use crate::types::OpError;
use std::path::Path;

/// Extensions accepted for validation and metadata.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "gif", "webp"];

/// Extensions the grayscale transform will write.
pub const CONVERTIBLE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "gif"];

fn extension_in(path: &Path, set: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| set.iter().any(|s| e.eq_ignore_ascii_case(s)))
}

pub fn has_supported_extension(path: &Path) -> bool {
    extension_in(path, SUPPORTED_EXTENSIONS)
}

pub fn is_convertible_extension(path: &Path) -> bool {
    extension_in(path, CONVERTIBLE_EXTENSIONS)
}

/// Check that `path` is an existing image file with a supported extension.
///
/// With `deep`, the file is also decoded to catch corruption. Read-only.
pub fn check_image(backend: &impl ImageBackend, path: &Path, deep: bool) -> Result<(), OpError> {
    if !path.is_file() {
        return Err(OpError::NotFound(path.to_path_buf()));
    }
    if !has_supported_extension(path) {
        return Err(OpError::unsupported(path));
    }
    if deep {
        backend
            .verify(path)
            .map_err(|e| OpError::from_backend("verify", path, e))?;
    }
    Ok(())
}

/// True iff `path` exists, has a supported extension and decodes.
///
/// Fails closed: any problem, including a decoder error, yields `false`.
pub fn is_valid_image(backend: &impl ImageBackend, path: &Path) -> bool {
    match check_image(backend, path, true) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("validate {}: {e}", path.display());
            false
        }
    }
}
