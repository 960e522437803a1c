//! Shared test utilities for the webpress test suite.
//!
//! Synthetic rasters for exercising the real encoder. Flat colors compress to
//! almost nothing in WebP, so the generators produce deterministic noise that
//! keeps encoded sizes proportional to quality.
//!
//! Also compiled into `tests/optimize_directory.rs` through `#[path]`, so it
//! must only depend on `image` and std.

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

/// Deterministic per-pixel hash; same (x, y, salt) always yields the same byte.
fn noise(x: u32, y: u32, salt: u32) -> u8 {
    let mut h = x
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add(y.wrapping_mul(0x85EB_CA6B))
        .wrapping_add(salt.wrapping_mul(0xC2B2_AE35));
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    (h & 0xFF) as u8
}

/// Opaque RGB noise.
pub fn noise_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([noise(x, y, 1), noise(x, y, 2), noise(x, y, 3)])
    })
}

/// RGBA noise whose alpha never reaches 255.
///
/// The WebP encoder drops the alpha channel when every pixel is fully opaque,
/// so alpha round-trip tests need genuinely translucent input.
pub fn translucent_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            noise(x, y, 1),
            noise(x, y, 2),
            noise(x, y, 3),
            32 + noise(x, y, 4) / 2,
        ])
    })
}

/// Write a noise JPEG of the given size.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    noise_rgb(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}
