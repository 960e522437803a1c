//! # webpress
//!
//! Batch image optimizer: converts every raster image in a directory to lossy
//! WebP, keeping each output under a byte budget.
//!
//! # Architecture: Scan, Optimize, Report
//!
//! ```text
//! 1. Scan      images/         →  sorted input list      (filesystem → paths)
//! 2. Optimize  each input      →  images/<stem>.webp     (decode, resize, quality search)
//! 3. Report    results         →  progress, summary, listing of .webp files
//! ```
//!
//! Only the first stage can fail a run. Once inputs are found, each image is
//! handled in isolation and a failure becomes a result with an error message.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Finds input images in a flat directory; lists `.webp` outputs |
//! | [`process`] | Batch driver: runs the policy per file, sends progress events |
//! | [`imaging`] | Re-encoding policy plus the decode/resize/encode backend |
//! | [`config`] | `webpress.toml` loading, validation, and merging onto defaults |
//! | [`types`] | `OptimizationResult`, the per-image outcome |
//! | [`summary`] | `RunSummary`, the order-independent fold over results |
//! | [`naming`] | Source path → `.webp` output path |
//! | [`output`] | CLI output formatting for progress, summary, and listing |
//!
//! # Design Decisions
//!
//! ## Two-Threshold Bypass
//!
//! A source is left untouched only when it already fits the budget *and* is
//! under the small-file threshold (150 KB by default). Files between the two
//! are still re-encoded: a 250 KB JPEG usually shrinks a lot as WebP, and the
//! conversion gives a uniform output format.
//!
//! ## Best Effort Over Failure
//!
//! Quality steps down a fixed ladder (80, then 75 to 50) and stops at the
//! first level that fits. When none fits, the last attempt is written anyway
//! and the result is marked as over budget. A slightly large WebP is more
//! useful than no WebP.
//!
//! ## Write Once
//!
//! Encode attempts stay in memory; the output file is written exactly once,
//! after the search settles. An interrupted run never leaves a half-searched
//! file behind that looks like a finished one.
//!
//! ## Lossy WebP Through libwebp
//!
//! The `image` crate decodes every input format but only encodes lossless
//! WebP. Encoding goes through the `webp` crate (libwebp bindings) behind the
//! [`imaging::ImageBackend`] trait, so the policy is tested against a mock.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;
pub mod summary;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
