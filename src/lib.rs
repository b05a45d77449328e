//! # Photo Porter
//!
//! Small, file-system-safe image housekeeping: select an image, inspect its
//! metadata, save a grayscale copy, rename it, or move it into another
//! folder. Nothing is ever overwritten except a previous grayscale copy of
//! the same file.
//!
//! # Architecture: One Core, Two Front Ends
//!
//! ```text
//!                 ┌────────── CLI (one operation per run)
//!   core library ─┤
//!                 └────────── shell ─ session ─ worker thread
//! ```
//!
//! The core operations are plain functions that take a path and return a
//! `Result`. The one-shot CLI calls them directly; the interactive shell
//! keeps a [`session::Session`] and hands every operation to a single
//! [`worker::Worker`] thread. Neither front end contains filesystem logic
//! of its own.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Codec seam (`ImageBackend`) and the `image`-crate implementation |
//! | [`validate`] | Supported extensions and the existence/decode gate |
//! | [`metadata`] | Fresh `ImageMetadata` snapshots from codec header + filesystem |
//! | [`transform`] | Grayscale conversion to `<stem>_bw<ext>` |
//! | [`naming`] | Pure name derivation: free `name_N` stems, `_bw` and rename targets |
//! | [`placement`] | Collision-safe move and rename |
//! | [`types`] | Shared types and the `OpError` taxonomy |
//! | [`history`] | Bounded in-memory record of operations |
//! | [`session`] | Current-file pointer, job construction, result application |
//! | [`worker`] | The single background thread |
//! | [`shell`] | Line-oriented interactive front end |
//! | [`config`] | `photo-porter.toml` loading and validation |
//! | [`output`] | Text formatting for results, metadata and history |
//!
//! # Design Decisions
//!
//! ## Color Mode From the Codec
//!
//! The reported color mode is what the decoder says about the pixel data,
//! never a guess from the file extension. An opaque PNG is `RGB`, the same
//! PNG with an alpha channel is `RGBA`.
//!
//! ## Never Overwrite (Except `_bw`)
//!
//! Move picks the next free `name_N.ext`; rename refuses an occupied name.
//! The grayscale copy is deterministic (`photo.png` → `photo_bw.png`) and is
//! replaced on re-run, written through a hidden staging file so a failed
//! encode never leaves a truncated image behind.
//!
//! ## Logging
//!
//! The library only emits through the `log` facade. The binary installs
//! `env_logger` once at startup.

pub mod config;
pub mod history;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod placement;
pub mod session;
pub mod shell;
pub mod transform;
pub mod types;
pub mod validate;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_helpers;
