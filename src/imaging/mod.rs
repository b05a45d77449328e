//! Image codec access: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | header-only decode via `image::ImageReader` |
//! | **Verify** | full decode, pixels discarded |
//! | **Grayscale** | `DynamicImage::to_luma8` |
//! | **Save** | `DynamicImage::save_with_format` |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait, [`ColorMode`], [`Container`], [`ImageHeader`]
//! - **RustBackend**: the production implementation

pub mod backend;
pub mod rust_backend;

pub use backend::{BackendError, ColorMode, Container, Dimensions, ImageBackend, ImageHeader};
pub use rust_backend::RustBackend;
