//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the policy engine
//! needs: decode, resize, and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): `image` for decoding
//! and resampling, libwebp (via the `webp` crate) for lossy encoding.

use super::params::{Quality, ResizeParams};
use super::raster::Raster;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Resize failed: {0}")]
    Resize(String),
    #[error("WebP encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Backends are stateless: every call receives everything it needs, and
/// nothing is retained between calls.
pub trait ImageBackend {
    /// Read and decode an image file into an 8-bit raster.
    fn decode(&self, path: &Path) -> Result<Raster, BackendError>;

    /// Resample a raster to exact dimensions. The color mode is preserved.
    fn resize(&self, raster: &Raster, params: &ResizeParams) -> Result<Raster, BackendError>;

    /// Encode a raster as lossy WebP, returning the encoded bytes.
    fn encode(&self, raster: &Raster, quality: Quality) -> Result<Vec<u8>, BackendError>;
}
