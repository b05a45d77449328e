//! Shared types used by the core operations and both front ends.
//!
//! Everything here is transient: built fresh for one user action and
//! dropped after it has been displayed.

use crate::imaging::{BackendError, ColorMode, Container};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Byte size plus the derived KB/MB figures, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FileSize {
    pub bytes: u64,
    pub kb: f64,
    pub mb: f64,
}

impl FileSize {
    pub fn from_bytes(bytes: u64) -> Self {
        Self {
            bytes,
            kb: round2(bytes as f64 / 1024.0),
            mb: round2(bytes as f64 / (1024.0 * 1024.0)),
        }
    }
}

/// Round half away from zero to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Snapshot of one image file. Never cached, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMetadata {
    pub filename: String,
    pub directory: PathBuf,
    pub size: FileSize,
    pub width: u32,
    pub height: u32,
    /// Container format detected from file content.
    pub format: Container,
    pub color_mode: ColorMode,
    /// `None` where the filesystem does not record creation time.
    pub created_at: Option<DateTime<Local>>,
    pub modified_at: Option<DateTime<Local>>,
}

impl ImageMetadata {
    /// `"100 x 50"`
    pub fn resolution(&self) -> String {
        format!("{} x {}", self.width, self.height)
    }
}

/// Success arm of a mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub new_path: PathBuf,
    pub message: String,
}

/// Outcome of a mutating operation as seen by the front ends.
pub type OperationResult = Result<Completed, OpError>;

/// A user-triggered action on the current file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Inspect,
    Grayscale,
    Move { destination: PathBuf },
    Rename { new_name: String },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Inspect => "inspect",
            Operation::Grayscale => "grayscale",
            Operation::Move { .. } => "move",
            Operation::Rename { .. } => "rename",
        }
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self, Operation::Inspect)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Move { destination } => write!(f, "move → {}", destination.display()),
            Operation::Rename { new_name } => write!(f, "rename → {new_name}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Coarse failure category, used for exit codes and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    UnsupportedFormat,
    InvalidImage,
    DestinationNotADirectory,
    NameCollision,
    InvalidName,
    PermissionOrIo,
}

#[derive(Error, Debug)]
pub enum OpError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported format '{extension}': {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },
    #[error("Not a readable image: {}: {reason}", .path.display())]
    InvalidImage { path: PathBuf, reason: String },
    #[error("Destination folder not found: {}", .0.display())]
    DestinationNotFound(PathBuf),
    #[error("Destination is not a folder: {}", .0.display())]
    DestinationNotADirectory(PathBuf),
    #[error("A file with that name already exists: {}", .0.display())]
    NameCollision(PathBuf),
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),
    #[error(
        "Move incomplete: copied to {} but could not remove {} or the copy",
        .copy.display(),
        .original.display()
    )]
    PartialMove { original: PathBuf, copy: PathBuf },
    #[error("Failed to {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {reason}", .path.display())]
    WriteFailed { path: PathBuf, reason: String },
}

impl OpError {
    pub fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        OpError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Translate a codec failure on `path` into the operation taxonomy.
    pub fn from_backend(op: &'static str, path: &Path, err: BackendError) -> Self {
        match err {
            BackendError::Io(source) => OpError::io(op, path, source),
            BackendError::Decode(reason) | BackendError::Unsupported(reason) => {
                OpError::InvalidImage {
                    path: path.to_path_buf(),
                    reason,
                }
            }
            BackendError::Encode(reason) => OpError::WriteFailed {
                path: path.to_path_buf(),
                reason,
            },
        }
    }

    pub fn unsupported(path: &Path) -> Self {
        OpError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            OpError::NotFound(_) | OpError::DestinationNotFound(_) => ErrorKind::NotFound,
            OpError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            OpError::InvalidImage { .. } => ErrorKind::InvalidImage,
            OpError::DestinationNotADirectory(_) => ErrorKind::DestinationNotADirectory,
            OpError::NameCollision(_) => ErrorKind::NameCollision,
            OpError::InvalidName(_) => ErrorKind::InvalidName,
            OpError::PartialMove { .. } | OpError::Io { .. } | OpError::WriteFailed { .. } => {
                ErrorKind::PermissionOrIo
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OpError::NotFound(_))
    }
}
