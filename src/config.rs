//! Optimizer configuration.
//!
//! Every setting has a built-in default, and a run with no config file uses
//! exactly those defaults. A `webpress.toml` in the source directory (or a
//! file passed with `--config`) can override any subset of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [budget]
//! max_size_kb = 300         # Largest acceptable WebP output
//! small_file_kb = 150       # Sources under this (and under max_size_kb) are skipped
//!
//! [resize]
//! max_width = 2000          # Wider images are downscaled to this width
//! filter = "lanczos3"       # nearest | triangle | catmullrom | lanczos3
//!
//! [quality]
//! initial = 80              # First encode attempt
//! fallback = [75, 70, 65, 60, 55, 50]  # Tried in order until one fits
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{BYTES_PER_KB, PolicyConfig, Quality, ResampleFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the source directory.
pub const CONFIG_FILENAME: &str = "webpress.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Optimizer configuration loaded from `webpress.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeConfig {
    /// Byte budget and bypass threshold.
    pub budget: BudgetConfig,
    /// Downscaling settings.
    pub resize: ResizeConfig,
    /// Encoder quality ladder.
    pub quality: QualityConfig,
}

/// Size limits, in kilobytes (1 KB = 1024 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BudgetConfig {
    pub max_size_kb: u64,
    pub small_file_kb: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_size_kb: 300,
            small_file_kb: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub max_width: u32,
    pub filter: ResampleFilter,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            max_width: 2000,
            filter: ResampleFilter::Lanczos3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    pub initial: u32,
    pub fallback: Vec<u32>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            initial: 80,
            fallback: vec![75, 70, 65, 60, 55, 50],
        }
    }
}

impl OptimizeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget.max_size_kb == 0 {
            return Err(ConfigError::Validation(
                "budget.max_size_kb must be greater than 0".into(),
            ));
        }
        if self.budget.max_size_kb.checked_mul(BYTES_PER_KB).is_none() {
            return Err(ConfigError::Validation(
                "budget.max_size_kb is too large".into(),
            ));
        }
        if self.resize.max_width == 0 {
            return Err(ConfigError::Validation(
                "resize.max_width must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.quality.initial) {
            return Err(ConfigError::Validation(
                "quality.initial must be 1-100".into(),
            ));
        }
        if self.quality.fallback.iter().any(|q| !(1..=100).contains(q)) {
            return Err(ConfigError::Validation(
                "quality.fallback values must be 1-100".into(),
            ));
        }
        let descending = std::iter::once(&self.quality.initial)
            .chain(&self.quality.fallback)
            .collect::<Vec<_>>()
            .windows(2)
            .all(|w| w[0] > w[1]);
        if !descending {
            return Err(ConfigError::Validation(
                "quality.fallback must be strictly descending and below quality.initial".into(),
            ));
        }
        Ok(())
    }

    /// Thresholds and quality ladder in the form the policy engine takes.
    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig {
            budget_bytes: self.budget.max_size_kb * BYTES_PER_KB,
            small_file_kb: self.budget.small_file_kb,
            max_width: self.resize.max_width,
            filter: self.resize.filter,
            initial_quality: Quality::new(self.quality.initial),
            fallback_qualities: self
                .quality
                .fallback
                .iter()
                .copied()
                .map(Quality::new)
                .collect(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(OptimizeConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<OptimizeConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: OptimizeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load an explicit config file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<OptimizeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `webpress.toml` from a directory, falling back to defaults when the
/// directory has none.
pub fn load_config(dir: &Path) -> Result<OptimizeConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.is_file() {
        return resolve_config(None);
    }
    load_config_file(&config_path)
}

/// Returns a fully-commented stock `webpress.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# webpress configuration
# ======================
# All settings are optional. Values shown below are the defaults.
# Place this file as webpress.toml in the image directory, or pass it
# with --config. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Size limits (1 KB = 1024 bytes)
# ---------------------------------------------------------------------------
[budget]
# Largest acceptable WebP output per image.
max_size_kb = 300

# Sources smaller than this, and within max_size_kb, are left untouched.
small_file_kb = 150

# ---------------------------------------------------------------------------
# Downscaling
# ---------------------------------------------------------------------------
[resize]
# Images wider than this are scaled down to it, keeping the aspect ratio.
max_width = 2000

# Resampling filter: "nearest", "triangle", "catmullrom" or "lanczos3".
filter = "lanczos3"

# ---------------------------------------------------------------------------
# Encoder quality (1 = smallest, 100 = best)
# ---------------------------------------------------------------------------
[quality]
# First encode attempt.
initial = 80

# Tried in order when the initial attempt is over budget. The first level
# that fits is kept; if none fits, the last one is kept anyway.
fallback = [75, 70, 65, 60, 55, 50]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_built_in_constants() {
        let config = OptimizeConfig::default();
        assert_eq!(config.budget.max_size_kb, 300);
        assert_eq!(config.budget.small_file_kb, 150);
        assert_eq!(config.resize.max_width, 2000);
        assert_eq!(config.resize.filter, ResampleFilter::Lanczos3);
        assert_eq!(config.quality.initial, 80);
        assert_eq!(config.quality.fallback, vec![75, 70, 65, 60, 55, 50]);
    }

    #[test]
    fn default_config_policy_matches_policy_default() {
        assert_eq!(OptimizeConfig::default().policy(), PolicyConfig::default());
    }

    #[test]
    fn policy_converts_kb_to_bytes() {
        let policy = OptimizeConfig::default().policy();
        assert_eq!(policy.budget_bytes, 307_200);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[budget]
max_size_kb = 200
"#;
        let config: OptimizeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.budget.max_size_kb, 200);
        // Default values preserved
        assert_eq!(config.budget.small_file_kb, 150);
        assert_eq!(config.quality.initial, 80);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, OptimizeConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[resize]
max_width = 1200
filter = "catmullrom"

[quality]
fallback = [70, 60]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.resize.max_width, 1200);
        assert_eq!(config.resize.filter, ResampleFilter::CatmullRom);
        assert_eq!(config.quality.fallback, vec![70, 60]);
        // Unspecified values should be defaults
        assert_eq!(config.quality.initial, 80);
        assert_eq!(config.budget.max_size_kb, 300);
    }

    #[test]
    fn load_config_file_missing_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[budget]\nmax_size = 100\n",
        )
        .unwrap();

        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<OptimizeConfig, _> = toml::from_str("[threads]\ncount = 4\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("[q]\nlist = [3, 2, 1]\nx = 1").unwrap();
        let overlay: toml::Value = toml::from_str("[q]\nlist = [9]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["q"]["list"].as_array().unwrap().len(), 1);
        assert_eq!(merged["q"]["x"].as_integer(), Some(1));
    }

    // =========================================================================
    // validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(OptimizeConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_budget() {
        let mut config = OptimizeConfig::default();
        config.budget.max_size_kb = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_budget_too_large_for_bytes() {
        let mut config = OptimizeConfig::default();
        config.budget.max_size_kb = u64::MAX / BYTES_PER_KB + 1;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.budget.max_size_kb = u64::MAX / BYTES_PER_KB;
        assert!(config.validate().is_ok());
        assert_eq!(config.policy().budget_bytes, u64::MAX / BYTES_PER_KB * BYTES_PER_KB);
    }

    #[test]
    fn resolve_config_rejects_huge_budget_from_toml() {
        let overlay: toml::Value = toml::from_str("[budget]\nmax_size_kb = 9223372036854775807\n").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_zero_width() {
        let mut config = OptimizeConfig::default();
        config.resize.max_width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_quality_out_of_range() {
        let mut config = OptimizeConfig::default();
        config.quality.initial = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = OptimizeConfig::default();
        config.quality.fallback = vec![50, 0];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_fallback_must_descend() {
        let mut config = OptimizeConfig::default();
        config.quality.fallback = vec![60, 70];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = OptimizeConfig::default();
        config.quality.fallback = vec![60, 60];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_fallback_must_start_below_initial() {
        let mut config = OptimizeConfig::default();
        config.quality.fallback = vec![90, 50];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_empty_fallback_is_allowed() {
        let mut config = OptimizeConfig::default();
        config.quality.fallback = Vec::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[quality]\nfallback = [85]\n",
        )
        .unwrap();

        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // stock config tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: OptimizeConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, OptimizeConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        let table = value.as_table().unwrap();
        for key in ["budget", "resize", "quality"] {
            assert!(table.contains_key(key), "missing section {key}");
        }
    }
}
