//! Pure calculation functions for dimensions and byte sizes.
//!
//! All functions here are pure and testable without any I/O or images.

/// Bytes per kilobyte, for both thresholds and reporting.
pub const BYTES_PER_KB: u64 = 1024;

/// Convert a byte count to (fractional) kilobytes.
pub fn bytes_to_kb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_KB as f64
}

/// Calculate the downscaled dimensions for an image wider than `max_width`.
///
/// Returns `None` when the image already fits, in which case it keeps its
/// original resolution. Otherwise the width becomes `max_width` and the
/// height is scaled by the same ratio, rounded to the nearest pixel and never
/// below 1.
///
/// # Examples
/// ```
/// # use webpress::imaging::calculate_fit_width;
/// assert_eq!(calculate_fit_width((3000, 2000), 2000), Some((2000, 1333)));
/// assert_eq!(calculate_fit_width((800, 600), 2000), None);
/// ```
pub fn calculate_fit_width(original: (u32, u32), max_width: u32) -> Option<(u32, u32)> {
    let (orig_w, orig_h) = original;
    if orig_w <= max_width {
        return None;
    }
    let ratio = max_width as f64 / orig_w as f64;
    let height = ((orig_h as f64 * ratio).round() as u32).max(1);
    Some((max_width, height))
}

/// Whether a source file is small enough to leave untouched.
///
/// Both conditions must hold: the file fits the byte budget *and* it is under
/// the small-file threshold. A file just under the budget but above the
/// threshold is still re-encoded.
pub fn should_bypass(original_bytes: u64, budget_bytes: u64, small_file_kb: u64) -> bool {
    original_bytes <= budget_bytes && bytes_to_kb(original_bytes) < small_file_kb as f64
}

/// Percentage saved going from `original` to `optimized`.
///
/// Returns `None` when `original` is zero.
pub fn savings_percent(original: f64, optimized: f64) -> Option<f64> {
    if original > 0.0 {
        Some((original - optimized) / original * 100.0)
    } else {
        None
    }
}
