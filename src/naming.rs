//! Output filename derivation.
//!
//! Every converted image is written next to its source, with the same stem
//! and a `.webp` extension:
//! - `photo.jpg` → `photo.webp`
//! - `Logo.PNG` → `Logo.webp`
//! - `archive.tar.png` → `archive.tar.webp` (only the last extension is replaced)
//!
//! Two sources sharing a stem (`hero.jpg`, `hero.png`) map to the same output;
//! the one processed last wins.

use std::path::{Path, PathBuf};

/// Extension of every file the optimizer writes.
pub const OUTPUT_EXTENSION: &str = "webp";

/// Output file name for a source file name, or `None` if it has no stem.
pub fn output_file_name(source: &Path) -> Option<String> {
    source
        .file_stem()
        .map(|stem| format!("{}.{}", stem.to_string_lossy(), OUTPUT_EXTENSION))
}

/// Full output path: same directory as the source, WebP extension.
pub fn output_path(source: &Path) -> PathBuf {
    source.with_extension(OUTPUT_EXTENSION)
}

/// Whether a file name looks like one of our outputs.
pub fn is_output_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == OUTPUT_EXTENSION)
}
