//! Input discovery and output listing.
//!
//! The optimizer works on a single flat directory:
//!
//! ```text
//! images/
//! ├── hero.jpg          # processed
//! ├── logo.PNG          # processed (extension match is case-insensitive)
//! ├── anim.gif          # processed (first frame)
//! ├── notes.txt         # ignored
//! ├── hero.webp         # output from a previous run (listed, never an input)
//! └── archive/          # ignored, no recursion
//! ```
//!
//! Inputs are returned sorted by file name so that progress output and the
//! output listing are identical from run to run.

use crate::naming::is_output_file;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Input extensions, matched case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} directory not found")]
    DirectoryNotFound(PathBuf),
    #[error("No images found in {0}")]
    NoImagesFound(PathBuf),
}

/// A WebP file present in the directory after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub size_bytes: u64,
}

/// Find every input image directly inside `dir`, sorted by file name.
pub fn scan(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirectoryNotFound(dir.to_path_buf()));
    }
    let images: Vec<PathBuf> = collect_entries(dir)?
        .into_iter()
        .filter(|p| is_image(p))
        .collect();
    if images.is_empty() {
        return Err(ScanError::NoImagesFound(dir.to_path_buf()));
    }
    Ok(images)
}

/// List the `.webp` files in `dir` with their sizes, sorted by file name.
pub fn scan_outputs(dir: &Path) -> Result<Vec<OutputFile>, ScanError> {
    let mut outputs = Vec::new();
    for path in collect_entries(dir)? {
        if !path.is_file() || !is_output_file(&path) {
            continue;
        }
        let size_bytes = fs::metadata(&path)?.len();
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        outputs.push(OutputFile { name, size_bytes });
    }
    Ok(outputs)
}

fn collect_entries(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut entries = fs::read_dir(dir)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, _>>()?;
    entries.sort();
    Ok(entries)
}

fn is_image(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}
