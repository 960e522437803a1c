//! Run-wide totals.
//!
//! [`RunSummary`] is built by folding [`OptimizationResult`]s, one at a time,
//! starting from [`RunSummary::empty`]. Every field is a count or a sum, so
//! the fold gives the same totals in any order.

use crate::imaging::savings_percent;
use crate::types::OptimizationResult;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    /// Every result, including failures.
    pub processed: usize,
    pub converted: usize,
    pub failed: usize,
    /// Sums over non-failed results only.
    pub total_original_kb: f64,
    pub total_optimized_kb: f64,
}

impl RunSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add one result to the totals.
    pub fn combine(self, result: &OptimizationResult) -> Self {
        if result.is_error() {
            return Self {
                processed: self.processed + 1,
                failed: self.failed + 1,
                ..self
            };
        }
        Self {
            processed: self.processed + 1,
            converted: self.converted + usize::from(result.was_converted),
            failed: self.failed,
            total_original_kb: self.total_original_kb + result.original_size_kb,
            total_optimized_kb: self.total_optimized_kb + result.final_size_kb,
        }
    }

    /// Fold a batch of results onto these totals.
    pub fn fold<'a>(self, results: impl IntoIterator<Item = &'a OptimizationResult>) -> Self {
        results.into_iter().fold(self, Self::combine)
    }

    /// Overall savings in percent, or `None` when nothing was measured.
    pub fn savings_percent(&self) -> Option<f64> {
        savings_percent(self.total_original_kb, self.total_optimized_kb)
    }
}

impl<'a> FromIterator<&'a OptimizationResult> for RunSummary {
    fn from_iter<I: IntoIterator<Item = &'a OptimizationResult>>(iter: I) -> Self {
        RunSummary::empty().fold(iter)
    }
}
