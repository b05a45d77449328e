//! Text output for both front ends.
//!
//! # Metadata
//!
//! ```text
//! sunset.png
//!     Folder: /home/me/Pictures
//!     Resolution: 100 x 50 px
//!     File size: 2048 B (2.00 KB, 0.00 MB)
//!     Format: PNG
//!     Color mode: RGB
//!     Created: 2026-03-01 14:22:10
//!     Modified: 2026-03-01 14:22:10
//! ```
//!
//! # History
//!
//! ```text
//! 001 14:22:31 grayscale sunset.png -> sunset_bw.png
//! 002 14:23:02 rename sunset.png FAILED: A file with that name already exists: ...
//! 2 recorded, 1 failed
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function is pure and returns `Vec<String>` (or a single
//! `String`) for testability; `print_*` wrappers write to stdout.

use crate::history::History;
use crate::types::{Completed, ImageMetadata, OpError};
use crate::worker::{JobOutput, WorkerEvent};
use chrono::{DateTime, Local};
use std::path::Path;

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn timestamp(at: Option<&DateTime<Local>>) -> String {
    at.map(|t| t.format(TIMESTAMP).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// ============================================================================
// Single results
// ============================================================================

pub fn format_metadata(info: &ImageMetadata) -> Vec<String> {
    let pad = indent(1);
    vec![
        info.filename.clone(),
        format!("{pad}Folder: {}", info.directory.display()),
        format!("{pad}Resolution: {} px", info.resolution()),
        format!(
            "{pad}File size: {} B ({:.2} KB, {:.2} MB)",
            info.size.bytes, info.size.kb, info.size.mb
        ),
        format!("{pad}Format: {}", info.format),
        format!("{pad}Color mode: {}", info.color_mode),
        format!("{pad}Created: {}", timestamp(info.created_at.as_ref())),
        format!("{pad}Modified: {}", timestamp(info.modified_at.as_ref())),
    ]
}

pub fn format_completed(done: &Completed) -> Vec<String> {
    vec![
        done.message.clone(),
        format!("{}Path: {}", indent(1), done.new_path.display()),
    ]
}

pub fn format_error(err: &OpError) -> String {
    format!("Error: {err}")
}

pub fn format_check(path: &Path, result: &Result<(), OpError>) -> String {
    match result {
        Ok(()) => format!("OK {}", path.display()),
        Err(e) => format!("INVALID {}: {e}", path.display()),
    }
}

pub fn format_result(result: &Result<JobOutput, OpError>) -> Vec<String> {
    match result {
        Ok(JobOutput::Metadata(info)) => format_metadata(info),
        Ok(JobOutput::Completed(done)) => format_completed(done),
        Err(e) => vec![format_error(e)],
    }
}

/// Shell progress: a `...` line when a job starts, the result when it ends.
pub fn format_event(event: &WorkerEvent) -> Vec<String> {
    match event {
        WorkerEvent::Started { job } => {
            vec![format!("{} {} ...", job.operation.name(), file_name(&job.source))]
        }
        WorkerEvent::Finished { result, .. } => format_result(result),
    }
}

// ============================================================================
// History
// ============================================================================

pub fn format_history(history: &History) -> Vec<String> {
    if history.is_empty() {
        return vec!["No operations yet.".to_string()];
    }
    let mut lines: Vec<String> = history
        .entries()
        .enumerate()
        .map(|(i, entry)| {
            let head = format!(
                "{} {} {} {}",
                format_index(i + 1),
                entry.at.format("%H:%M:%S"),
                entry.operation.name(),
                file_name(&entry.source)
            );
            match &entry.outcome {
                Ok(path) => format!("{head} -> {}", file_name(path)),
                Err(msg) => format!("{head} FAILED: {msg}"),
            }
        })
        .collect();
    lines.push(format!(
        "{} recorded, {} failed",
        history.len(),
        history.failures()
    ));
    lines
}

// ============================================================================
// Print wrappers
// ============================================================================

pub fn print_result(result: &Result<JobOutput, OpError>) {
    for line in format_result(result) {
        println!("{}", line);
    }
}
