//! Configuration for color extraction.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Default maximum decompression ratio (decompressed:compressed).
pub const DEFAULT_MAX_DECOMPRESSION_RATIO: u32 = 100;

/// Default maximum decompressed stream size in bytes (100 MB).
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 100 * 1024 * 1024;

/// What to do with color operations in a color space that has no device
/// mapping (ICCBased resources, Separation, Pattern, custom names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedColorPolicy {
    /// Drop the operation and count it as unsupported.
    #[default]
    Skip,
    /// Map by operand count (1 = gray, 3 = RGB, 4 = CMYK) and flag the
    /// result as approximate. Other operand counts are still skipped.
    BestEffort,
}

/// Color extraction configuration.
///
/// # Example
///
/// ```
/// use pdf_chroma::config::{ExtractionConfig, UnsupportedColorPolicy};
///
/// let config = ExtractionConfig::new()
///     .with_stroke(false)
///     .with_unsupported_policy(UnsupportedColorPolicy::BestEffort);
/// assert!(config.count_fill);
/// assert!(!config.count_stroke);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Count fill colors (`g`, `rg`, `k`, `sc`, `scn`).
    pub count_fill: bool,

    /// Count stroke colors (`G`, `RG`, `K`, `SC`, `SCN`).
    pub count_stroke: bool,

    /// Handling of operations in unsupported color spaces.
    pub unsupported_policy: UnsupportedColorPolicy,

    /// Maximum decompression ratio. 0 disables the check.
    pub max_decompression_ratio: u32,

    /// Maximum decompressed size in bytes. 0 disables the check.
    pub max_decompressed_size: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            count_fill: true,
            count_stroke: true,
            unsupported_policy: UnsupportedColorPolicy::Skip,
            max_decompression_ratio: DEFAULT_MAX_DECOMPRESSION_RATIO,
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Count fill colors.
    pub fn with_fill(mut self, enable: bool) -> Self {
        self.count_fill = enable;
        self
    }

    /// Count stroke colors.
    pub fn with_stroke(mut self, enable: bool) -> Self {
        self.count_stroke = enable;
        self
    }

    /// Set the policy for unsupported color spaces.
    pub fn with_unsupported_policy(mut self, policy: UnsupportedColorPolicy) -> Self {
        self.unsupported_policy = policy;
        self
    }

    /// Set the maximum decompression ratio.
    pub fn with_max_decompression_ratio(mut self, ratio: u32) -> Self {
        self.max_decompression_ratio = ratio;
        self
    }

    /// Set the maximum decompressed size in bytes.
    pub fn with_max_decompressed_size(mut self, size: usize) -> Self {
        self.max_decompressed_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert!(config.count_fill);
        assert!(config.count_stroke);
        assert_eq!(config.unsupported_policy, UnsupportedColorPolicy::Skip);
        assert_eq!(config.max_decompression_ratio, 100);
        assert_eq!(config.max_decompressed_size, 100 * 1024 * 1024);
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            ExtractionConfig::from_json(r#"{"count_stroke": false, "unsupported_policy": "best_effort"}"#)
                .unwrap();
        assert!(config.count_fill);
        assert!(!config.count_stroke);
        assert_eq!(config.unsupported_policy, UnsupportedColorPolicy::BestEffort);
        assert_eq!(config.max_decompression_ratio, DEFAULT_MAX_DECOMPRESSION_RATIO);
    }

    #[test]
    fn test_from_json_invalid() {
        let result = ExtractionConfig::from_json(r#"{"unsupported_policy": "guess"}"#);
        assert!(matches!(result, Err(crate::error::Error::Config(_))));
    }

    #[test]
    fn test_builder_limits() {
        let config = ExtractionConfig::new()
            .with_max_decompression_ratio(0)
            .with_max_decompressed_size(1024);
        assert_eq!(config.max_decompression_ratio, 0);
        assert_eq!(config.max_decompressed_size, 1024);
    }
}
