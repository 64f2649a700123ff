//! Data profiling module for dataset health analysis.
//!
//! This module provides:
//! - Per-column missing-value counts and type information
//! - Duplicate row detection
//! - Descriptive statistics for numeric columns

pub mod statistics;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::{ColumnHealthRecord, DatasetHealthSummary, NumericSummary};
use crate::utils::inferred_type_label;
use polars::prelude::*;
use tracing::{debug, warn};

/// Data profiler for analyzing dataset structure and health.
pub struct DataProfiler;

impl DataProfiler {
    /// Compute the health summary of a dataset.
    ///
    /// Nothing is cached: the summary always reflects the dataset passed in.
    /// An empty dataset yields zero percentages rather than an error.
    pub fn health_summary(dataset: &Dataset) -> Result<DatasetHealthSummary> {
        let df = dataset.frame();
        let height = df.height();

        if height == 0 {
            warn!("Dataset has no rows; missing percentages are reported as 0");
        }

        let columns = dataset
            .column_kinds()
            .zip(df.get_columns())
            .map(|((name, kind), col)| {
                let missing_count = col.null_count();
                let missing_percentage = if height > 0 {
                    (missing_count as f64 / height as f64) * 100.0
                } else {
                    0.0
                };

                ColumnHealthRecord {
                    name: name.to_string(),
                    dtype: col.dtype().to_string(),
                    kind,
                    missing_count,
                    missing_percentage,
                    inferred_type: inferred_type_label(col.dtype()).to_string(),
                }
            })
            .collect();

        let duplicate_rows = Self::count_duplicates(df)?;
        debug!("Found {} duplicate rows", duplicate_rows);

        Ok(DatasetHealthSummary {
            row_count: height,
            column_count: df.width(),
            columns,
            duplicate_rows,
            memory_bytes: df.estimated_size(),
        })
    }

    /// Number of rows identical to an earlier row (first occurrence excluded).
    pub fn count_duplicates(df: &DataFrame) -> Result<usize> {
        if df.height() == 0 || df.width() == 0 {
            return Ok(0);
        }

        let unique_rows = df
            .unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
            .height();
        Ok(df.height() - unique_rows)
    }

    /// Descriptive statistics (count, mean, std, min, quartiles, max) for
    /// every numeric column.
    pub fn describe(dataset: &Dataset) -> Result<Vec<NumericSummary>> {
        dataset
            .numeric_columns()
            .into_iter()
            .map(|column| {
                let floats = statistics::to_float(dataset.series(&column)?)?;
                Self::summarize(column, &floats)
            })
            .collect()
    }

    fn summarize(column: String, floats: &Float64Chunked) -> Result<NumericSummary> {
        Ok(NumericSummary {
            column,
            count: statistics::count(floats),
            mean: floats.mean(),
            std: statistics::sample_std(floats),
            min: floats.min(),
            q1: statistics::quantile(floats, 0.25)?,
            median: floats.median(),
            q3: statistics::quantile(floats, 0.75)?,
            max: floats.max(),
        })
    }
}
