//! Collision-safe move and rename.
//!
//! Neither operation ever overwrites an existing file:
//!
//! - [`move_image`] picks the next free `name_N.ext` in the destination.
//! - [`rename_file`] refuses with [`OpError::NameCollision`].
//!
//! ## Check-then-act
//!
//! Both look for a free name and then rename. Another process can create
//! the chosen name in between; on Unix `rename(2)` would then replace that
//! file. This is fine for one person driving one tool, but the functions
//! must not be shared between concurrent callers as a locking primitive.
//!
//! ## Case sensitivity
//!
//! Existence checks follow the host filesystem. On a case-insensitive
//! volume `Photo.png` and `photo.png` collide; on a case-sensitive one
//! they do not.

use crate::naming::{occupied, renamed_path, safe_destination};
use crate::types::OpError;
use std::io;
use std::path::{Path, PathBuf};

/// Remove `path`, ignoring "already gone".
pub(crate) fn discard(path: &Path) {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            log::warn!("could not remove {}: {e}", path.display());
        }
        _ => {}
    }
}

/// Move `source` into `destination_dir`, returning the new path.
///
/// When the filename is taken in the destination, `_1`, `_2`, … is
/// appended to the stem; the lowest free counter wins. The file is
/// relocated, not copied: on success nothing remains at `source`.
///
/// Across filesystems the move falls back to copy + delete. If the delete
/// fails the copy is removed again; if that also fails the error is
/// [`OpError::PartialMove`] naming both files.
pub fn move_image(source: &Path, destination_dir: &Path) -> Result<PathBuf, OpError> {
    if !source.is_file() {
        return Err(OpError::NotFound(source.to_path_buf()));
    }
    if !destination_dir.exists() {
        return Err(OpError::DestinationNotFound(destination_dir.to_path_buf()));
    }
    if !destination_dir.is_dir() {
        return Err(OpError::DestinationNotADirectory(
            destination_dir.to_path_buf(),
        ));
    }

    let filename = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| OpError::NotFound(source.to_path_buf()))?;
    let target = safe_destination(destination_dir, &filename);

    match std::fs::rename(source, &target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!("{} is on another device, copying", target.display());
            copy_then_remove(source, &target)?;
        }
        Err(e) => return Err(OpError::io("move", source, e)),
    }

    log::info!("moved: {} -> {}", source.display(), target.display());
    Ok(target)
}

fn copy_then_remove(source: &Path, target: &Path) -> Result<(), OpError> {
    if let Err(e) = std::fs::copy(source, target) {
        discard(target);
        return Err(OpError::io("move", source, e));
    }
    if let Err(e) = std::fs::remove_file(source) {
        return match std::fs::remove_file(target) {
            Ok(()) => Err(OpError::io("move", source, e)),
            Err(_) => Err(OpError::PartialMove {
                original: source.to_path_buf(),
                copy: target.to_path_buf(),
            }),
        };
    }
    Ok(())
}

/// Trimmed stem, or `InvalidName` for names that would leave the directory.
fn checked_stem(new_name: &str) -> Result<&str, OpError> {
    let stem = new_name.trim();
    let bad = stem.is_empty()
        || stem == "."
        || stem == ".."
        || stem.contains(['/', '\\', '\0']);
    if bad {
        return Err(OpError::InvalidName(new_name.to_string()));
    }
    Ok(stem)
}

/// Rename `old_path` to `new_name` plus the original extension, in place.
///
/// The caller supplies the stem only. If the resolved name exists the
/// rename is refused with `NameCollision` and both files stay as they were.
pub fn rename_file(old_path: &Path, new_name: &str) -> Result<PathBuf, OpError> {
    if !old_path.is_file() {
        return Err(OpError::NotFound(old_path.to_path_buf()));
    }
    let stem = checked_stem(new_name)?;
    let target = renamed_path(old_path, stem);
    if occupied(&target) {
        return Err(OpError::NameCollision(target));
    }

    std::fs::rename(old_path, &target).map_err(|e| OpError::io("rename", old_path, e))?;

    log::info!("renamed: {} -> {}", old_path.display(), target.display());
    Ok(target)
}
