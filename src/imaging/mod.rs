//! Image processing: decode, downscale, and size-constrained WebP encoding.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, GIF, BMP) |
//! | **Resize** | `image::imageops::resize`, Lanczos3 by default |
//! | **Encode → WebP** | `webp::Encoder` (lossy) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and size math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Raster**: The opaque/alpha pixel buffer the policy works on
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Policy**: The skip/resize/quality-search decision procedure

pub mod backend;
mod calculations;
mod params;
pub mod policy;
pub mod raster;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    BYTES_PER_KB, bytes_to_kb, calculate_fit_width, savings_percent, should_bypass,
};
pub use params::{Quality, ResampleFilter, ResizeParams};
pub use policy::{EncodingAttempt, PolicyConfig, PolicyError, optimize_image};
pub use raster::{ColorMode, Raster, SourceImage};
pub use rust_backend::RustBackend;
