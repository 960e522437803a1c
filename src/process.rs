//! Batch driver.
//!
//! Scans the source directory, runs the [policy](crate::imaging::policy) on
//! each image in file-name order, folds the results into a [`RunSummary`],
//! and lists the WebP files present afterwards.
//!
//! ## Failure containment
//!
//! Only the directory checks can fail a run ([`ScanError`]). Anything that
//! goes wrong for a single image (unreadable file, decode failure, encode
//! failure, write failure) becomes an [`OptimizationResult`] with `error`
//! set, and the run moves on to the next file.
//!
//! ## Progress
//!
//! When given a channel, the driver sends a [`ProcessEvent`] as each image
//! finishes. The binary prints them from a separate thread; processing itself
//! is strictly sequential.

use crate::config::OptimizeConfig;
use crate::imaging::{
    BYTES_PER_KB, BackendError, ImageBackend, PolicyConfig, PolicyError, RustBackend,
    SourceImage, optimize_image,
};
use crate::naming::{output_file_name, output_path};
use crate::scan::{OutputFile, ScanError, scan, scan_outputs};
use crate::summary::RunSummary;
use crate::types::OptimizationResult;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Progress notifications sent while a run is underway.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// Inputs were found; processing is about to start.
    RunStarted {
        image_count: usize,
        budget_kb: u64,
    },
    /// One image is done (skipped, converted, or failed).
    ImageProcessed {
        /// 1-based position in the sorted input list.
        index: usize,
        result: OptimizationResult,
        /// Name of the written WebP file, when one was written.
        output: Option<String>,
    },
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One result per input, in processing order.
    pub results: Vec<OptimizationResult>,
    pub summary: RunSummary,
    /// WebP files in the source directory after the run, sorted by name.
    pub outputs: Vec<OutputFile>,
}

/// Optimize every image in `source_dir` with the production backend.
pub fn process(
    source_dir: &Path,
    config: &OptimizeConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunReport, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, source_dir, &config.policy(), events)
}

/// Optimize every image using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    source_dir: &Path,
    policy: &PolicyConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunReport, ProcessError> {
    let inputs = scan(source_dir)?;
    info!(count = inputs.len(), dir = %source_dir.display(), "found images");

    send(
        &events,
        ProcessEvent::RunStarted {
            image_count: inputs.len(),
            budget_kb: policy.budget_bytes / BYTES_PER_KB,
        },
    );

    let mut results = Vec::with_capacity(inputs.len());
    for (i, path) in inputs.iter().enumerate() {
        let result = optimize_file(backend, path, policy);
        let output = if result.was_converted {
            output_file_name(path)
        } else {
            None
        };
        send(
            &events,
            ProcessEvent::ImageProcessed {
                index: i + 1,
                result: result.clone(),
                output,
            },
        );
        results.push(result);
    }

    let summary = RunSummary::empty().fold(&results);
    let outputs = scan_outputs(source_dir)?;

    Ok(RunReport {
        results,
        summary,
        outputs,
    })
}

/// Decode one file and run the policy on it.
///
/// Never fails: any error is folded into the returned result.
pub fn optimize_file(
    backend: &impl ImageBackend,
    path: &Path,
    policy: &PolicyConfig,
) -> OptimizationResult {
    match load_and_optimize(backend, path, policy) {
        Ok(result) => result,
        Err(e) => {
            info!(file = %path.display(), error = %e, "image failed");
            let filename = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            OptimizationResult::failed(filename, e.to_string())
        }
    }
}

fn load_and_optimize(
    backend: &impl ImageBackend,
    path: &Path,
    policy: &PolicyConfig,
) -> Result<OptimizationResult, ProcessError> {
    let original_size = std::fs::metadata(path)?.len();
    let raster = backend.decode(path)?;
    let source = SourceImage {
        path: path.to_path_buf(),
        raster,
        original_size,
    };
    Ok(optimize_image(
        backend,
        &source,
        &output_path(path),
        policy,
    )?)
}

fn send(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // The receiver going away only means nobody is printing.
        tx.send(event).ok();
    }
}
