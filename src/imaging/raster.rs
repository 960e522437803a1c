//! Decoded pixel buffers.
//!
//! Decoders hand back many pixel layouts (palette, grayscale, 16-bit,
//! with or without alpha). The policy engine only cares about one question:
//! does the image carry an alpha channel? [`Raster`] answers it once, at
//! decode time, so the encode path never has to inspect color types again.
//!
//! Only four-channel RGBA sources keep their alpha. Grayscale with alpha,
//! palette images and GIFs are flattened to opaque RGB, even though decoders
//! expand some of them to RGBA.

use super::backend::Dimensions;
use image::{DynamicImage, ExtendedColorType, RgbImage, RgbaImage};
use std::path::PathBuf;

/// Whether an image is encoded with or without an alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Opaque,
    WithAlpha,
}

impl ColorMode {
    /// Mode for a source color type as stored in the file.
    pub fn for_color_type(color: ExtendedColorType) -> Self {
        match color {
            ExtendedColorType::Rgba1
            | ExtendedColorType::Rgba2
            | ExtendedColorType::Rgba4
            | ExtendedColorType::Rgba8
            | ExtendedColorType::Rgba16
            | ExtendedColorType::Rgba32F => ColorMode::WithAlpha,
            _ => ColorMode::Opaque,
        }
    }
}

/// An 8-bit pixel buffer, either three-channel or four-channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Raster {
    Opaque(RgbImage),
    WithAlpha(RgbaImage),
}

impl Raster {
    /// Normalize a decoded image by its own color type.
    ///
    /// RGBA (any depth) keeps its alpha; everything else, including
    /// grayscale with alpha, becomes opaque RGB.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let mode = ColorMode::for_color_type(img.color().into());
        Self::with_mode(img, mode)
    }

    /// Convert a decoded image to the layout chosen for its source.
    pub fn with_mode(img: DynamicImage, mode: ColorMode) -> Self {
        match mode {
            ColorMode::WithAlpha => Raster::WithAlpha(img.into_rgba8()),
            ColorMode::Opaque => Raster::Opaque(img.into_rgb8()),
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        match self {
            Raster::Opaque(_) => ColorMode::Opaque,
            Raster::WithAlpha(_) => ColorMode::WithAlpha,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        let (width, height) = match self {
            Raster::Opaque(buf) => buf.dimensions(),
            Raster::WithAlpha(buf) => buf.dimensions(),
        };
        Dimensions { width, height }
    }
}

/// A decoded source file plus the facts the policy needs about it.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub raster: Raster,
    /// Size of the file on disk, in bytes.
    pub original_size: u64,
}

impl SourceImage {
    /// File name without directory, for reporting.
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}
