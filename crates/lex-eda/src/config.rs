//! Configuration types for the analysis engine.
//!
//! Strategy and method options are closed enums parsed at the boundary, so a
//! typo fails fast with [`AnalysisError::InvalidStrategy`] or
//! [`AnalysisError::InvalidMethod`] instead of silently doing nothing.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Strategy for handling missing values once sparse columns are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    /// Numeric columns get the column mean, categorical columns the mode
    #[default]
    Mean,
    /// Numeric columns get the column median, categorical columns the mode
    Median,
    /// Propagate the previous value, then back-fill leading gaps
    ForwardFill,
    /// Drop every row that still contains a missing value
    Drop,
}

impl MissingStrategy {
    pub const ALL: [MissingStrategy; 4] = [
        MissingStrategy::Mean,
        MissingStrategy::Median,
        MissingStrategy::ForwardFill,
        MissingStrategy::Drop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MissingStrategy::Mean => "mean",
            MissingStrategy::Median => "median",
            MissingStrategy::ForwardFill => "forward_fill",
            MissingStrategy::Drop => "drop",
        }
    }
}

impl fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingStrategy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(MissingStrategy::Mean),
            "median" => Ok(MissingStrategy::Median),
            "forward_fill" | "forward-fill" | "ffill" => Ok(MissingStrategy::ForwardFill),
            "drop" => Ok(MissingStrategy::Drop),
            _ => Err(AnalysisError::InvalidStrategy(s.to_string())),
        }
    }
}

/// Method used to flag outliers in a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// Tukey fences: below Q1 - 1.5*IQR or above Q3 + 1.5*IQR
    #[default]
    Iqr,
    /// Absolute z-score (sample standard deviation) above the threshold
    #[serde(alias = "z_score")]
    Zscore,
}

impl OutlierMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutlierMethod::Iqr => "iqr",
            OutlierMethod::Zscore => "zscore",
        }
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutlierMethod {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iqr" => Ok(OutlierMethod::Iqr),
            "zscore" | "z-score" | "z_score" => Ok(OutlierMethod::Zscore),
            _ => Err(AnalysisError::InvalidMethod(s.to_string())),
        }
    }
}

/// Configuration for an analysis session.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust
/// use lex_eda::config::{AnalysisConfig, MissingStrategy, OutlierMethod};
///
/// let config = AnalysisConfig::builder()
///     .missing_threshold(0.3)
///     .missing_strategy(MissingStrategy::Median)
///     .outlier_method(OutlierMethod::Zscore)
///     .build()
///     .unwrap();
/// assert_eq!(config.missing_threshold, 0.3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum tolerated missing fraction (0.0 - 1.0) before a column is
    /// dropped by the cleaning step.
    /// Default: 0.5
    pub missing_threshold: f64,

    /// Strategy applied to the columns that survive the threshold step.
    /// Default: Mean
    pub missing_strategy: MissingStrategy,

    /// Default outlier detection method.
    /// Default: Iqr
    pub outlier_method: OutlierMethod,

    /// Fence multiplier for the IQR method.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Cut-off for the absolute z-score.
    /// Default: 3.0
    pub zscore_threshold: f64,

    /// Directory for reports and charts.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Report file name (without extension).
    /// Default: "analysis_report"
    pub report_name: String,

    /// Chart width in pixels.
    /// Default: 1200
    pub plot_width: u32,

    /// Chart height in pixels.
    /// Default: 1000
    pub plot_height: u32,

    /// Number of numeric columns plotted when none are named.
    /// Default: 6
    pub max_plot_columns: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            missing_threshold: 0.5,
            missing_strategy: MissingStrategy::default(),
            outlier_method: OutlierMethod::default(),
            iqr_multiplier: 1.5,
            zscore_threshold: 3.0,
            output_dir: PathBuf::from("output"),
            report_name: "analysis_report".to_string(),
            plot_width: 1200,
            plot_height: 1000,
            max_plot_columns: 6,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Read a configuration from a JSON file. Missing fields take their
    /// default values; the result is validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: AnalysisConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_threshold(self.missing_threshold)?;

        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(ConfigValidationError::NonPositive {
                field: "iqr_multiplier".to_string(),
                value: self.iqr_multiplier,
            });
        }

        if !(self.zscore_threshold.is_finite() && self.zscore_threshold > 0.0) {
            return Err(ConfigValidationError::NonPositive {
                field: "zscore_threshold".to_string(),
                value: self.zscore_threshold,
            });
        }

        if self.plot_width == 0 || self.plot_height == 0 {
            return Err(ConfigValidationError::InvalidPlotSize {
                width: self.plot_width,
                height: self.plot_height,
            });
        }

        if self.report_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyReportName);
        }

        Ok(())
    }
}

/// Check that a missing-value threshold lies in `[0, 1]`.
pub fn validate_threshold(threshold: f64) -> Result<(), ConfigValidationError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ConfigValidationError::InvalidThreshold {
            field: "missing_threshold".to_string(),
            value: threshold,
        })
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid value for '{field}': {value} (must be a positive number)")]
    NonPositive { field: String, value: f64 },

    #[error("Invalid plot size {width}x{height} (both dimensions must be non-zero)")]
    InvalidPlotSize { width: u32, height: u32 },

    #[error("Report name must not be empty")]
    EmptyReportName,
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    missing_threshold: Option<f64>,
    missing_strategy: Option<MissingStrategy>,
    outlier_method: Option<OutlierMethod>,
    iqr_multiplier: Option<f64>,
    zscore_threshold: Option<f64>,
    output_dir: Option<PathBuf>,
    report_name: Option<String>,
    plot_width: Option<u32>,
    plot_height: Option<u32>,
    max_plot_columns: Option<usize>,
}

impl AnalysisConfigBuilder {
    /// Set the maximum tolerated missing fraction per column.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.5 = 50%)
    pub fn missing_threshold(mut self, threshold: f64) -> Self {
        self.missing_threshold = Some(threshold);
        self
    }

    /// Set the missing-value strategy.
    pub fn missing_strategy(mut self, strategy: MissingStrategy) -> Self {
        self.missing_strategy = Some(strategy);
        self
    }

    /// Set the default outlier detection method.
    pub fn outlier_method(mut self, method: OutlierMethod) -> Self {
        self.outlier_method = Some(method);
        self
    }

    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    pub fn zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = Some(threshold);
        self
    }

    /// Set the output directory for reports and charts.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the report file name (without extension).
    pub fn report_name(mut self, name: impl Into<String>) -> Self {
        self.report_name = Some(name.into());
        self
    }

    /// Set the chart size in pixels.
    pub fn plot_size(mut self, width: u32, height: u32) -> Self {
        self.plot_width = Some(width);
        self.plot_height = Some(height);
        self
    }

    pub fn max_plot_columns(mut self, n: usize) -> Self {
        self.max_plot_columns = Some(n);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            missing_threshold: self.missing_threshold.unwrap_or(defaults.missing_threshold),
            missing_strategy: self.missing_strategy.unwrap_or_default(),
            outlier_method: self.outlier_method.unwrap_or_default(),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            zscore_threshold: self.zscore_threshold.unwrap_or(defaults.zscore_threshold),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            report_name: self.report_name.unwrap_or(defaults.report_name),
            plot_width: self.plot_width.unwrap_or(defaults.plot_width),
            plot_height: self.plot_height.unwrap_or(defaults.plot_height),
            max_plot_columns: self.max_plot_columns.unwrap_or(defaults.max_plot_columns),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.missing_threshold, 0.5);
        assert_eq!(config.missing_strategy, MissingStrategy::Mean);
        assert_eq!(config.outlier_method, OutlierMethod::Iqr);
        assert_eq!(config.zscore_threshold, 3.0);
        assert_eq!(config.max_plot_columns, 6);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .missing_threshold(0.2)
            .missing_strategy(MissingStrategy::ForwardFill)
            .outlier_method(OutlierMethod::Zscore)
            .plot_size(800, 600)
            .report_name("eda")
            .build()
            .unwrap();

        assert_eq!(config.missing_threshold, 0.2);
        assert_eq!(config.missing_strategy, MissingStrategy::ForwardFill);
        assert_eq!(config.outlier_method, OutlierMethod::Zscore);
        assert_eq!((config.plot_width, config.plot_height), (800, 600));
        assert_eq!(config.report_name, "eda");
    }

    #[test]
    fn test_validation_invalid_threshold() {
        let result = AnalysisConfig::builder().missing_threshold(1.5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));

        let result = AnalysisConfig::builder().missing_threshold(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_plot_size() {
        let result = AnalysisConfig::builder().plot_size(0, 100).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidPlotSize { width: 0, .. }
        ));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("mean".parse::<MissingStrategy>().unwrap(), MissingStrategy::Mean);
        assert_eq!(
            "Forward_Fill".parse::<MissingStrategy>().unwrap(),
            MissingStrategy::ForwardFill
        );
        assert_eq!("ffill".parse::<MissingStrategy>().unwrap(), MissingStrategy::ForwardFill);

        let err = "interpolate".parse::<MissingStrategy>().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidStrategy(ref s) if s == "interpolate"));
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("IQR".parse::<OutlierMethod>().unwrap(), OutlierMethod::Iqr);
        assert_eq!("z-score".parse::<OutlierMethod>().unwrap(), OutlierMethod::Zscore);

        let err = "dbscan".parse::<OutlierMethod>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_METHOD");
    }

    #[test]
    fn test_strategy_display_round_trips() {
        for strategy in MissingStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<MissingStrategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "missing_threshold": 0.25,
            "missing_strategy": "forward_fill",
            "outlier_method": "zscore",
            "report_name": "weekly"
        }"#;

        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.missing_threshold, 0.25);
        assert_eq!(config.missing_strategy, MissingStrategy::ForwardFill);
        assert_eq!(config.outlier_method, OutlierMethod::Zscore);
        assert_eq!(config.report_name, "weekly");
        // unspecified fields fall back to defaults
        assert_eq!(config.iqr_multiplier, 1.5);
    }

    #[test]
    fn test_config_from_json_rejects_unknown_strategy() {
        let json = r#"{ "missing_strategy": "interpolate" }"#;
        assert!(serde_json::from_str::<AnalysisConfig>(json).is_err());
    }
}
