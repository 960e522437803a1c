//! Shared types passed from the policy engine to the driver and reporter.

/// Outcome of optimizing one source file.
///
/// Produced exactly once per input file, whether it was skipped, converted,
/// or failed. Failed results carry `error` and zero sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub filename: String,
    pub original_size_kb: f64,
    /// Size of the written WebP file, or the original size when skipped.
    pub final_size_kb: f64,
    pub was_converted: bool,
    pub error: Option<String>,
    /// Quality of the encoding that was kept.
    pub quality: Option<u32>,
    /// Output dimensions when the image was downscaled.
    pub resized_to: Option<(u32, u32)>,
    /// False only when even the lowest quality tried exceeded the budget.
    pub within_budget: bool,
}

impl OptimizationResult {
    /// The source was already small enough; nothing was written.
    pub fn bypassed(filename: impl Into<String>, original_size_kb: f64) -> Self {
        Self {
            filename: filename.into(),
            original_size_kb,
            final_size_kb: original_size_kb,
            was_converted: false,
            error: None,
            quality: None,
            resized_to: None,
            within_budget: true,
        }
    }

    /// The source was converted and a WebP file was written.
    pub fn converted(
        filename: impl Into<String>,
        original_size_kb: f64,
        final_size_kb: f64,
        quality: u32,
        resized_to: Option<(u32, u32)>,
        within_budget: bool,
    ) -> Self {
        Self {
            filename: filename.into(),
            original_size_kb,
            final_size_kb,
            was_converted: true,
            error: None,
            quality: Some(quality),
            resized_to,
            within_budget,
        }
    }

    /// Decoding, encoding or writing failed somewhere for this file.
    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            original_size_kb: 0.0,
            final_size_kb: 0.0,
            was_converted: false,
            error: Some(error.into()),
            quality: None,
            resized_to: None,
            within_budget: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
