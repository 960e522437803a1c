//! Production image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, BMP) | `image` crate (pure Rust decoders, format sniffed from content) |
//! | Resize | `image::imageops::resize` with the configured filter (Lanczos3 by default) |
//! | Encode → WebP | `webp::Encoder` (libwebp, lossy, RGB or RGBA input) |
//!
//! The `image` crate's own WebP encoder only writes lossless files, which
//! makes a quality search meaningless; libwebp is used for the lossy path.
//!
//! ## Color mode
//!
//! Decoders expand GIFs and palette or color-keyed PNGs to RGBA, so the
//! decoded color type alone cannot tell a true RGBA source from a flattened
//! one. The mode is resolved from the source layout instead:
//!
//! | Source | Mode |
//! |---|---|
//! | PNG, IHDR color type 6 (RGBA) | alpha |
//! | PNG, any other color type | opaque |
//! | GIF | opaque |
//! | JPEG, BMP | as reported by the decoder (RGBA BMP keeps alpha) |

use super::backend::{BackendError, ImageBackend};
use super::params::{Quality, ResampleFilter, ResizeParams};
use super::raster::{ColorMode, Raster};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// IHDR color type for truecolor with alpha.
const PNG_COLOR_TYPE_RGBA: u8 = 6;

/// Backend built on the `image` and `webp` crates.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn filter_type(filter: ResampleFilter) -> FilterType {
    match filter {
        ResampleFilter::Nearest => FilterType::Nearest,
        ResampleFilter::Triangle => FilterType::Triangle,
        ResampleFilter::CatmullRom => FilterType::CatmullRom,
        ResampleFilter::Lanczos3 => FilterType::Lanczos3,
    }
}

fn source_color_mode(
    format: Option<ImageFormat>,
    original: ExtendedColorType,
    bytes: &[u8],
) -> ColorMode {
    match format {
        Some(ImageFormat::Png) if png_color_type(bytes) == Some(PNG_COLOR_TYPE_RGBA) => {
            ColorMode::WithAlpha
        }
        Some(ImageFormat::Png) | Some(ImageFormat::Gif) => ColorMode::Opaque,
        _ => ColorMode::for_color_type(original),
    }
}

/// Color type byte from a PNG's IHDR chunk, which always follows the
/// 8-byte signature.
fn png_color_type(bytes: &[u8]) -> Option<u8> {
    if bytes.get(12..16)? != b"IHDR" {
        return None;
    }
    bytes.get(25).copied()
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<Raster, BackendError> {
        let decode_error = |e: image::ImageError| BackendError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        let bytes = std::fs::read(path)?;
        let reader = ImageReader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;
        let format = reader.format();
        let decoder = reader.into_decoder().map_err(decode_error)?;
        let mode = source_color_mode(format, decoder.original_color_type(), &bytes);
        let img = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
        Ok(Raster::with_mode(img, mode))
    }

    fn resize(&self, raster: &Raster, params: &ResizeParams) -> Result<Raster, BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::Resize(format!(
                "invalid target size {}x{}",
                params.width, params.height
            )));
        }
        let filter = filter_type(params.filter);
        Ok(match raster {
            Raster::Opaque(buf) => {
                Raster::Opaque(imageops::resize(buf, params.width, params.height, filter))
            }
            Raster::WithAlpha(buf) => {
                Raster::WithAlpha(imageops::resize(buf, params.width, params.height, filter))
            }
        })
    }

    fn encode(&self, raster: &Raster, quality: Quality) -> Result<Vec<u8>, BackendError> {
        let encoder = match raster {
            Raster::Opaque(buf) => webp::Encoder::from_rgb(buf.as_raw(), buf.width(), buf.height()),
            Raster::WithAlpha(buf) => {
                webp::Encoder::from_rgba(buf.as_raw(), buf.width(), buf.height())
            }
        };
        let encoded = encoder
            .encode_simple(false, quality.as_factor())
            .map_err(|e| BackendError::Encode(format!("{e:?}")))?;
        Ok(encoded.to_vec())
    }
}
