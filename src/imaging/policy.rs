//! Size-constrained re-encoding policy.
//!
//! Decides, for one decoded image, whether to leave it alone, whether to
//! downscale it, and which quality level to keep. In order:
//!
//! 1. **Bypass** when the file is within the budget *and* under the
//!    small-file threshold. Nothing is written.
//! 2. **Resize** to `max_width` when wider, keeping the aspect ratio.
//! 3. **Encode** at the initial quality; stop if it fits the budget.
//! 4. **Search** the fallback qualities from highest to lowest and keep the
//!    first that fits. This is a linear scan, not a search for the largest
//!    quality that fits.
//! 5. **Best effort**: when nothing fits, keep the last (lowest) attempt.
//!
//! All attempts stay in memory. The output file is written exactly once,
//! after the search has settled on an attempt, so the output directory never
//! holds an intermediate quality level.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{BYTES_PER_KB, bytes_to_kb, calculate_fit_width, should_bypass};
use super::params::{Quality, ResampleFilter, ResizeParams};
use super::raster::{Raster, SourceImage};
use crate::types::OptimizationResult;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Thresholds and quality ladder for the policy.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Largest acceptable output, in bytes.
    pub budget_bytes: u64,
    /// Files under this many KB (and within budget) are left untouched.
    pub small_file_kb: u64,
    pub max_width: u32,
    pub filter: ResampleFilter,
    pub initial_quality: Quality,
    /// Tried in order after the initial quality misses the budget.
    pub fallback_qualities: Vec<Quality>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            budget_bytes: 300 * BYTES_PER_KB,
            small_file_kb: 150,
            max_width: 2000,
            filter: ResampleFilter::Lanczos3,
            initial_quality: Quality::new(80),
            fallback_qualities: [75, 70, 65, 60, 55, 50]
                .into_iter()
                .map(Quality::new)
                .collect(),
        }
    }
}

/// One encoded candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingAttempt {
    pub quality: Quality,
    pub bytes: Vec<u8>,
}

impl EncodingAttempt {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Run the policy on one decoded image, writing at most one file to
/// `output_path`.
pub fn optimize_image(
    backend: &impl ImageBackend,
    source: &SourceImage,
    output_path: &Path,
    config: &PolicyConfig,
) -> Result<OptimizationResult, PolicyError> {
    let filename = source.filename();
    let original_kb = bytes_to_kb(source.original_size);

    if should_bypass(
        source.original_size,
        config.budget_bytes,
        config.small_file_kb,
    ) {
        debug!(file = %filename, size_kb = original_kb, "already small, skipping");
        return Ok(OptimizationResult::bypassed(filename, original_kb));
    }

    let dims = source.raster.dimensions();
    let resize = calculate_fit_width((dims.width, dims.height), config.max_width).map(
        |(width, height)| ResizeParams {
            width,
            height,
            filter: config.filter,
        },
    );

    let resized;
    let raster = match &resize {
        Some(params) => {
            debug!(
                file = %filename,
                from = %format!("{}x{}", dims.width, dims.height),
                to = %format!("{}x{}", params.width, params.height),
                "resizing"
            );
            resized = backend.resize(&source.raster, params)?;
            &resized
        }
        None => &source.raster,
    };

    let (attempt, within_budget) = search_quality(backend, raster, config)?;

    std::fs::write(output_path, &attempt.bytes).map_err(|source| PolicyError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    Ok(OptimizationResult::converted(
        filename,
        original_kb,
        bytes_to_kb(attempt.size()),
        attempt.quality.value(),
        resize.map(|p| (p.width, p.height)),
        within_budget,
    ))
}

/// Encode at the initial quality, then walk the fallback ladder until an
/// attempt fits. Returns the kept attempt and whether it fits the budget.
pub fn search_quality(
    backend: &impl ImageBackend,
    raster: &Raster,
    config: &PolicyConfig,
) -> Result<(EncodingAttempt, bool), BackendError> {
    let mut attempt = encode_attempt(backend, raster, config.initial_quality)?;
    if attempt.size() <= config.budget_bytes {
        return Ok((attempt, true));
    }

    for &quality in &config.fallback_qualities {
        attempt = encode_attempt(backend, raster, quality)?;
        if attempt.size() <= config.budget_bytes {
            return Ok((attempt, true));
        }
    }

    Ok((attempt, false))
}

fn encode_attempt(
    backend: &impl ImageBackend,
    raster: &Raster,
    quality: Quality,
) -> Result<EncodingAttempt, BackendError> {
    let bytes = backend.encode(raster, quality)?;
    debug!(
        quality = quality.value(),
        size_kb = bytes_to_kb(bytes.len() as u64),
        "encoded"
    );
    Ok(EncodingAttempt { quality, bytes })
}
