//! The in-memory table every analysis operation works on.

use crate::cleaner::{CleaningSummary, MissingValueHandler};
use crate::config::{AnalysisConfig, MissingStrategy, OutlierMethod};
use crate::correlation::CorrelationAnalyzer;
use crate::error::{AnalysisError, Result};
use crate::outliers::{OutlierDetector, OutlierParams};
use crate::profiler::DataProfiler;
use crate::types::{ColumnKind, CorrelationMatrix, DatasetHealthSummary, NumericSummary, OutlierMask};
use crate::utils::{column_kind, is_dictionary_dtype, nan_to_null};
use polars::prelude::*;
use std::path::Path;

/// A loaded table plus the kind of each of its columns.
///
/// Column kinds are decided once, here, from the storage types. Every
/// operation reads the dataset and returns a new value; cleaning returns a
/// new `Dataset` and leaves `self` untouched.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    kinds: Vec<ColumnKind>,
}

static_assertions::assert_impl_all!(Dataset: Send, Sync);

impl Dataset {
    /// Wrap a polars `DataFrame`.
    ///
    /// Floating `NaN` values become nulls so they count as missing, and
    /// dictionary-encoded columns are decoded to plain strings.
    pub fn new(frame: DataFrame) -> Result<Self> {
        let mut frame = frame;
        let mut replacements = Vec::new();

        for col in frame.get_columns() {
            let series = col.as_materialized_series();
            if is_dictionary_dtype(series.dtype()) {
                replacements.push(series.cast(&DataType::String)?);
            } else if let Some(cleaned) = nan_to_null(series)? {
                replacements.push(cleaned);
            }
        }

        for series in replacements {
            let name = series.name().to_string();
            frame.replace(&name, series)?;
        }

        let kinds = frame
            .get_columns()
            .iter()
            .map(|col| column_kind(col.dtype()))
            .collect();

        Ok(Self { frame, kinds })
    }

    /// Load a dataset from a CSV, Excel or Parquet file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        crate::loader::load_dataset(path)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Column names paired with their kinds, in column order.
    pub fn column_kinds(&self) -> impl Iterator<Item = (&str, ColumnKind)> + '_ {
        self.frame
            .get_columns()
            .iter()
            .map(|col| col.name().as_str())
            .zip(self.kinds.iter().copied())
    }

    pub fn kind(&self, column: &str) -> Result<ColumnKind> {
        self.column_kinds()
            .find(|(name, _)| *name == column)
            .map(|(_, kind)| kind)
            .ok_or_else(|| AnalysisError::ColumnNotFound(column.to_string()))
    }

    /// Names of the numeric columns, in column order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.column_kinds()
            .filter(|(_, kind)| kind.is_numeric())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Look up a column by name.
    pub fn series(&self, column: &str) -> Result<&Series> {
        self.frame
            .column(column)
            .map(|col| col.as_materialized_series())
            .map_err(|_| AnalysisError::ColumnNotFound(column.to_string()))
    }

    /// Look up a column that must be numeric.
    pub fn numeric_series(&self, column: &str) -> Result<&Series> {
        match self.kind(column)? {
            ColumnKind::Numeric => self.series(column),
            other => Err(AnalysisError::not_numeric(column, other.as_str())),
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Compute the dataset health summary.
    pub fn health_summary(&self) -> Result<DatasetHealthSummary> {
        DataProfiler::health_summary(self)
    }

    /// Descriptive statistics for every numeric column.
    pub fn describe(&self) -> Result<Vec<NumericSummary>> {
        DataProfiler::describe(self)
    }

    /// Drop sparse columns, then fill or drop the remaining missing values.
    ///
    /// `threshold` is the maximum tolerated missing fraction per column.
    pub fn handle_missing(&self, strategy: MissingStrategy, threshold: f64) -> Result<Dataset> {
        MissingValueHandler::handle(self, strategy, threshold).map(|(dataset, _)| dataset)
    }

    /// Like [`Dataset::handle_missing`] but also reports what was changed.
    pub fn handle_missing_with_summary(
        &self,
        strategy: MissingStrategy,
        threshold: f64,
    ) -> Result<(Dataset, CleaningSummary)> {
        MissingValueHandler::handle(self, strategy, threshold)
    }

    /// Flag outliers in a numeric column with the default fences
    /// (1.5 x IQR, |z| > 3).
    pub fn detect_outliers(&self, column: &str, method: OutlierMethod) -> Result<OutlierMask> {
        OutlierDetector::detect(self, column, method, &OutlierParams::default())
    }

    /// Flag outliers using the fences configured in `config`.
    pub fn detect_outliers_with(
        &self,
        column: &str,
        method: OutlierMethod,
        config: &AnalysisConfig,
    ) -> Result<OutlierMask> {
        OutlierDetector::detect(self, column, method, &OutlierParams::from(config))
    }

    /// Pearson correlation between all numeric columns.
    pub fn correlate(&self) -> Result<CorrelationMatrix> {
        CorrelationAnalyzer::correlate(self)
    }
}

impl TryFrom<DataFrame> for Dataset {
    type Error = AnalysisError;

    fn try_from(frame: DataFrame) -> Result<Self> {
        Dataset::new(frame)
    }
}
