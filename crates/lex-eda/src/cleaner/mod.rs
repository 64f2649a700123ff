//! Missing-value handling.
//!
//! Cleaning runs in two steps:
//! 1. Drop every column whose missing fraction exceeds the threshold
//! 2. Apply the chosen [`MissingStrategy`] to the remaining columns
//!
//! The input dataset is never modified; a new [`Dataset`] is returned.

use crate::config::{MissingStrategy, validate_threshold};
use crate::dataset::Dataset;
use crate::error::{Result, ResultExt};
use crate::imputers::{SequentialImputer, StatisticalImputer};
use crate::types::ColumnKind;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What a cleaning run changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub strategy: MissingStrategy,
    pub threshold: f64,
    /// Columns removed by the threshold step.
    pub dropped_columns: Vec<String>,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Number of cells that received an imputed value.
    pub filled_cells: usize,
    /// Human-readable log of the actions taken.
    pub steps: Vec<String>,
}

/// Applies a missing-value strategy to a dataset.
pub struct MissingValueHandler;

impl MissingValueHandler {
    pub fn handle(
        dataset: &Dataset,
        strategy: MissingStrategy,
        threshold: f64,
    ) -> Result<(Dataset, CleaningSummary)> {
        validate_threshold(threshold)?;

        let mut summary = CleaningSummary {
            strategy,
            threshold,
            rows_before: dataset.height(),
            ..Default::default()
        };

        let df = Self::drop_sparse_columns(dataset, threshold, &mut summary)?;

        let df = match strategy {
            MissingStrategy::Mean | MissingStrategy::Median => {
                Self::impute_statistical(dataset, df, strategy, &mut summary)?
            }
            MissingStrategy::ForwardFill => Self::forward_fill(df, &mut summary)?,
            MissingStrategy::Drop => Self::drop_incomplete_rows(df, &mut summary)?,
        };

        summary.rows_after = df.height();
        info!(
            "Missing values handled using '{}' strategy: {} columns dropped, {} cells filled, {} rows removed",
            strategy,
            summary.dropped_columns.len(),
            summary.filled_cells,
            summary.rows_before - summary.rows_after
        );

        Ok((Dataset::new(df)?, summary))
    }

    /// Parse the strategy from text, failing with
    /// [`AnalysisError::InvalidStrategy`] when it is not recognised.
    pub fn handle_str(
        dataset: &Dataset,
        strategy: &str,
        threshold: f64,
    ) -> Result<(Dataset, CleaningSummary)> {
        let strategy: MissingStrategy = strategy.parse()?;
        Self::handle(dataset, strategy, threshold)
    }

    fn drop_sparse_columns(
        dataset: &Dataset,
        threshold: f64,
        summary: &mut CleaningSummary,
    ) -> Result<DataFrame> {
        let df = dataset.frame();
        let height = df.height();
        if height == 0 {
            return Ok(df.clone());
        }

        let sparse: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() as f64 / height as f64 > threshold)
            .map(|col| col.name().to_string())
            .collect();

        summary.steps.push(format!(
            "Dropped {} columns with >{}% missing values",
            sparse.len(),
            threshold * 100.0
        ));

        if sparse.is_empty() {
            return Ok(df.clone());
        }

        debug!("Dropping sparse columns: {:?}", sparse);
        let names: Vec<PlSmallStr> = sparse.iter().map(|s| s.as_str().into()).collect();
        summary.dropped_columns = sparse;
        Ok(df.drop_many(names))
    }

    fn impute_statistical(
        dataset: &Dataset,
        mut df: DataFrame,
        strategy: MissingStrategy,
        summary: &mut CleaningSummary,
    ) -> Result<DataFrame> {
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        for name in names {
            let series = df.column(&name)?.as_materialized_series().clone();
            let missing = series.null_count();
            if missing == 0 {
                continue;
            }
            if missing == series.len() {
                warn!("Column '{}' has no values to impute from; left as missing", name);
                continue;
            }

            let filled = match dataset.kind(&name)? {
                ColumnKind::Numeric => {
                    let imputed = if strategy == MissingStrategy::Median {
                        StatisticalImputer::numeric_median(&series)
                    } else {
                        StatisticalImputer::numeric_mean(&series)
                    };
                    imputed.context(format!("Imputing '{name}'"))?.map(|(s, value)| {
                        summary.steps.push(format!(
                            "Filled {missing} values in '{name}' with {strategy}: {value:.4}"
                        ));
                        s
                    })
                }
                ColumnKind::Categorical => StatisticalImputer::mode(&series)
                    .context(format!("Imputing '{name}'"))?
                    .map(|(s, value)| {
                        summary.steps.push(format!(
                            "Filled {missing} values in '{name}' with mode: {value}"
                        ));
                        s
                    }),
                ColumnKind::Missing => None,
            };

            if let Some(filled) = filled {
                summary.filled_cells += missing;
                df.replace(&name, filled)?;
            }
        }

        Ok(df)
    }

    fn forward_fill(mut df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        for name in names {
            let series = df.column(&name)?.as_materialized_series().clone();
            let missing = series.null_count();
            if missing == series.len() && missing > 0 {
                warn!("Column '{}' is entirely missing; forward fill has nothing to propagate", name);
            }

            if let Some(filled) = SequentialImputer::forward_fill(&series)
                .context(format!("Forward filling '{name}'"))?
            {
                summary.filled_cells += missing;
                summary
                    .steps
                    .push(format!("Forward filled {missing} values in '{name}'"));
                df.replace(&name, filled)?;
            }
        }

        Ok(df)
    }

    fn drop_incomplete_rows(df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
        let mut keep = vec![true; df.height()];
        for col in df.get_columns() {
            if col.null_count() == 0 {
                continue;
            }
            let nulls = col.as_materialized_series().is_null();
            for (keep_row, is_null) in keep.iter_mut().zip(nulls.into_iter()) {
                if is_null.unwrap_or(false) {
                    *keep_row = false;
                }
            }
        }

        let mask = BooleanChunked::from_slice("mask".into(), &keep);
        let filtered = df.filter(&mask)?;

        let removed = df.height() - filtered.height();
        summary
            .steps
            .push(format!("Removed {removed} rows containing missing values"));
        Ok(filtered)
    }
}

/// Clean a dataset with a strategy given as text, returning only the new dataset.
pub fn handle_missing(dataset: &Dataset, strategy: &str, threshold: f64) -> Result<Dataset> {
    MissingValueHandler::handle_str(dataset, strategy, threshold).map(|(ds, _)| ds)
}
