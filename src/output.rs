//! CLI output formatting.
//!
//! Each image leads with its 1-based position and file name; what happened to
//! it follows as indented context lines. The run ends with a summary block and
//! a listing of every WebP file in the directory.
//!
//! # Output Format
//!
//! ```text
//! Optimizing 3 images (target: 300 KB WebP each)
//!
//! 001 hero.jpg
//!     Original: 512.00 KB
//!     Resized: 2000x1333
//!     Converted: 240.13 KB at quality 80 → hero.webp
//!     Savings: 53.1%
//! 002 logo.png
//!     Original: 40.00 KB
//!     Skipped: already small
//! 003 broken.gif
//!     Error: Failed to decode images/broken.gif: ...
//!
//! Summary
//!     Images processed: 3
//!     Converted to WebP: 1
//!     Failed: 1
//!     Total original: 552.00 KB
//!     Total optimized: 280.13 KB
//!     Total savings: 49.3%
//!
//! WebP files (2)
//!     hero.webp (240.13 KB)
//!     old.webp (12.00 KB)
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function returns `Vec<String>` and does no I/O, so the
//! layout is unit-testable; `print_*` wrappers write the lines to stdout.

use crate::imaging::{bytes_to_kb, savings_percent};
use crate::process::ProcessEvent;
use crate::scan::{OutputFile, ScanError};
use crate::summary::RunSummary;
use crate::types::OptimizationResult;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_kb(kb: f64) -> String {
    format!("{:.2} KB", kb)
}

fn format_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}

// ============================================================================
// Progress
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::RunStarted {
            image_count,
            budget_kb,
        } => {
            let noun = if *image_count == 1 { "image" } else { "images" };
            vec![
                format!(
                    "Optimizing {} {} (target: {} KB WebP each)",
                    image_count, noun, budget_kb
                ),
                String::new(),
            ]
        }
        ProcessEvent::ImageProcessed {
            index,
            result,
            output,
        } => format_result(*index, result, output.as_deref()),
    }
}

fn format_result(index: usize, result: &OptimizationResult, output: Option<&str>) -> Vec<String> {
    let ctx = indent(1);
    let mut lines = vec![format!("{} {}", format_index(index), result.filename)];

    if let Some(error) = &result.error {
        lines.push(format!("{ctx}Error: {error}"));
        return lines;
    }

    lines.push(format!("{ctx}Original: {}", format_kb(result.original_size_kb)));

    if !result.was_converted {
        lines.push(format!("{ctx}Skipped: already small"));
        return lines;
    }

    if let Some((w, h)) = result.resized_to {
        lines.push(format!("{ctx}Resized: {w}x{h}"));
    }

    let mut converted = format!("{ctx}Converted: {}", format_kb(result.final_size_kb));
    if let Some(q) = result.quality {
        converted.push_str(&format!(" at quality {q}"));
    }
    if !result.within_budget {
        converted.push_str(" (over budget)");
    }
    if let Some(name) = output {
        converted.push_str(&format!(" \u{2192} {name}"));
    }
    lines.push(converted);

    if let Some(pct) = savings_percent(result.original_size_kb, result.final_size_kb) {
        lines.push(format!("{ctx}Savings: {}", format_percent(pct)));
    }
    lines
}

// ============================================================================
// Summary and listing
// ============================================================================

/// Format the end-of-run totals.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let ctx = indent(1);
    let mut lines = vec![
        String::new(),
        "Summary".to_string(),
        format!("{ctx}Images processed: {}", summary.processed),
        format!("{ctx}Converted to WebP: {}", summary.converted),
    ];
    if summary.failed > 0 {
        lines.push(format!("{ctx}Failed: {}", summary.failed));
    }
    lines.push(format!(
        "{ctx}Total original: {}",
        format_kb(summary.total_original_kb)
    ));
    lines.push(format!(
        "{ctx}Total optimized: {}",
        format_kb(summary.total_optimized_kb)
    ));
    if let Some(pct) = summary.savings_percent() {
        lines.push(format!("{ctx}Total savings: {}", format_percent(pct)));
    }
    lines
}

/// Format the list of WebP files present after the run.
///
/// Empty when there are none.
pub fn format_output_listing(outputs: &[OutputFile]) -> Vec<String> {
    if outputs.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), format!("WebP files ({})", outputs.len())];
    for file in outputs {
        lines.push(format!(
            "{}{} ({})",
            indent(1),
            file.name,
            format_kb(bytes_to_kb(file.size_bytes))
        ));
    }
    lines
}

/// One-line report for a run that could not start.
pub fn format_scan_error(err: &ScanError) -> String {
    match err {
        ScanError::DirectoryNotFound(dir) => {
            format!("Directory not found: {}", dir.display())
        }
        ScanError::NoImagesFound(dir) => format!(
            "No images found in {} (looking for .jpg, .jpeg, .png, .gif, .bmp)",
            dir.display()
        ),
        ScanError::Io(e) => format!("Could not read directory: {e}"),
    }
}

/// Print the summary block and output listing to stdout.
pub fn print_run_report(summary: &RunSummary, outputs: &[OutputFile]) {
    for line in format_summary(summary)
        .into_iter()
        .chain(format_output_listing(outputs))
    {
        println!("{}", line);
    }
}
