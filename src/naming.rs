//! Filename derivation shared by the transform and placement operations.
//!
//! Nothing in here mutates the filesystem. The only I/O is the existence
//! probe in [`get_safe_filename`].
//!
//! ## Collision suffixes
//!
//! When a name is taken, a counter is appended to the stem, before the
//! extension. The lowest free integer starting at 1 wins:
//!
//! - `photo.png` → `photo_1.png` → `photo_2.png` → …
//!
//! ## Derived grayscale names
//!
//! The grayscale output sits next to its source with a fixed `_bw` suffix:
//!
//! - `holiday.JPG` → `holiday_bw.JPG`
//! - `scan.tiff` → `scan_bw.tiff`

use std::path::{Path, PathBuf};

/// Suffix appended to the stem of a grayscale output.
pub const GRAYSCALE_SUFFIX: &str = "_bw";

/// Split a filename into stem and extension, the extension keeping its dot.
///
/// - `"photo.png"` → `("photo", ".png")`
/// - `"archive.tar.gz"` → `("archive.tar", ".gz")`
/// - `".hidden"` → `(".hidden", "")`
/// - `"README"` → `("README", "")`
pub fn split_name(filename: &str) -> (String, String) {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

/// Extension of `path` with a leading dot, or empty.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// The `n`-th collision candidate for `base`: `base` itself for 0, else `base_n`.
pub fn candidate_name(base: &str, n: u32) -> String {
    if n == 0 {
        base.to_string()
    } else {
        format!("{base}_{n}")
    }
}

fn with_extension(stem: &str, extension: &str) -> String {
    if extension.is_empty() || extension.starts_with('.') {
        format!("{stem}{extension}")
    } else {
        format!("{stem}.{extension}")
    }
}

/// True if anything, including a dangling symlink, occupies `path`.
pub fn occupied(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// Find a stem that is free in `directory` for the given extension.
///
/// Probes `base`, `base_1`, `base_2`, … and returns the first stem whose
/// `<stem><extension>` is not [`occupied`]. `extension` may be given with or
/// without its leading dot. The returned value is the stem only.
///
/// The probe is a snapshot: another process can take the name before the
/// caller uses it.
pub fn get_safe_filename(directory: &Path, base_name: &str, extension: &str) -> String {
    let mut n = 0;
    loop {
        let stem = candidate_name(base_name, n);
        if !occupied(&directory.join(with_extension(&stem, extension))) {
            return stem;
        }
        n += 1;
    }
}

/// Full collision-free destination for placing `filename` into `directory`.
pub fn safe_destination(directory: &Path, filename: &str) -> PathBuf {
    let (stem, ext) = split_name(filename);
    let free = get_safe_filename(directory, &stem, &ext);
    directory.join(with_extension(&free, &ext))
}

/// Sibling path for the grayscale output of `source`: `<stem>_bw<ext>`.
///
/// Returns `None` when `source` has no file name (e.g. `/` or `..`).
pub fn grayscale_path(source: &Path) -> Option<PathBuf> {
    let filename = source.file_name()?.to_string_lossy().into_owned();
    let (stem, ext) = split_name(&filename);
    Some(source.with_file_name(format!("{stem}{GRAYSCALE_SUFFIX}{ext}")))
}

/// Path a rename to `new_stem` resolves to: same directory, original extension.
pub fn renamed_path(source: &Path, new_stem: &str) -> PathBuf {
    source.with_file_name(with_extension(new_stem, &dotted_extension(source)))
}
