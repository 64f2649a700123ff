//! Exploratory Data Analysis Library
//!
//! A tabular analysis engine built with Rust and Polars.
//!
//! # Overview
//!
//! This library loads a table and answers the first questions anyone asks of it:
//!
//! - **Health Summary**: shape, per-column missing counts, duplicate rows, memory footprint
//! - **Missing Values**: drop sparse columns, then fill (mean/median/mode or forward fill) or drop rows
//! - **Outliers**: IQR fences or z-scores on any numeric column
//! - **Correlation**: pairwise-complete Pearson matrix over numeric columns
//! - **Reports and Charts**: text/JSON reports and SVG histograms, box plots and heatmaps
//!
//! Every operation reads a [`Dataset`] and returns a new value; nothing is
//! mutated in place.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_eda::{Dataset, MissingStrategy, OutlierMethod};
//!
//! let dataset = Dataset::from_path("data/train.csv")?;
//!
//! let summary = dataset.health_summary()?;
//! println!("{} rows, {} duplicates", summary.row_count, summary.duplicate_rows);
//!
//! // Drop columns missing more than half their values, fill the rest
//! let cleaned = dataset.handle_missing(MissingStrategy::Median, 0.5)?;
//!
//! let mask = cleaned.detect_outliers("fare", OutlierMethod::Iqr)?;
//! println!("{} outliers in fare", mask.outlier_count());
//!
//! let matrix = cleaned.correlate()?;
//! println!("{:?}", matrix.get("age", "fare"));
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to tune thresholds and output locations:
//!
//! ```rust,ignore
//! use lex_eda::config::*;
//!
//! let config = AnalysisConfig::builder()
//!     .missing_threshold(0.7)      // Drop columns with >70% missing
//!     .missing_strategy(MissingStrategy::ForwardFill)
//!     .outlier_method(OutlierMethod::Zscore)
//!     .zscore_threshold(2.5)
//!     .plot_size(1600, 1200)
//!     .build()?;
//!
//! let mask = dataset.detect_outliers_with("fare", config.outlier_method, &config)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod correlation;
pub mod dataset;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod outliers;
pub mod plotting;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{handle_missing, CleaningSummary, MissingValueHandler};
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, MissingStrategy, OutlierMethod,
};
pub use correlation::CorrelationAnalyzer;
pub use dataset::Dataset;
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use imputers::{SequentialImputer, StatisticalImputer};
pub use loader::{load_dataset, save_dataset, FileFormat};
pub use outliers::{OutlierDetector, OutlierParams};
pub use plotting::{ChartRenderer, PlotOptions};
pub use profiler::DataProfiler;
pub use reporting::{AnalysisReport, ReportGenerator};
pub use types::{
    ColumnHealthRecord, ColumnKind, CorrelationMatrix, DatasetHealthSummary, NumericSummary,
    OutlierMask,
};
