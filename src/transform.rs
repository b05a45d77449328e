//! Grayscale conversion.
//!
//! Writes `<stem>_bw<ext>` next to the source and never touches the source
//! itself. An existing `_bw` file is replaced without asking: running the
//! conversion twice yields the same output path, not `_bw_1`. This is the
//! opposite of move/rename, which never overwrite.
//!
//! The encoded bytes go to a hidden `.part` sibling first and are renamed
//! over the final name only once the encoder has finished, so a failed
//! encode leaves no truncated output behind.
//!
//! The staging name `.<stem>_bw<ext>.part` is reserved. If something
//! already sits there the conversion is refused with
//! [`OpError::NameCollision`] and that file is left alone.

use crate::imaging::{Container, ImageBackend};
use crate::naming::{grayscale_path, occupied};
use crate::placement::discard;
use crate::types::OpError;
use crate::validate::is_convertible_extension;
use std::path::{Path, PathBuf};

const OP: &str = "convert";

fn staging_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!(".{name}.part"))
}

/// Convert `source` to grayscale, returning the path of the written file.
pub fn convert_to_grayscale(
    backend: &impl ImageBackend,
    source: &Path,
) -> Result<PathBuf, OpError> {
    if !source.is_file() {
        return Err(OpError::NotFound(source.to_path_buf()));
    }
    if !is_convertible_extension(source) {
        return Err(OpError::unsupported(source));
    }
    let container = source
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Container::from_extension)
        .ok_or_else(|| OpError::unsupported(source))?;
    let output = grayscale_path(source).ok_or_else(|| OpError::NotFound(source.to_path_buf()))?;
    let staging = staging_path(&output);
    if occupied(&staging) {
        return Err(OpError::NameCollision(staging));
    }

    let image = backend
        .open(source)
        .map_err(|e| OpError::from_backend(OP, source, e))?;
    let gray = backend.to_grayscale(image);

    if let Err(e) = backend.save(&gray, &staging, container) {
        discard(&staging);
        return Err(OpError::from_backend(OP, &output, e));
    }
    if let Err(e) = std::fs::rename(&staging, &output) {
        discard(&staging);
        return Err(OpError::io(OP, &output, e));
    }

    log::info!(
        "converted to grayscale: {} -> {}",
        source.display(),
        output.display()
    );
    Ok(output)
}
