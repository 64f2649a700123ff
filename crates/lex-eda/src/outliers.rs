//! Outlier detection module.
//!
//! Two interchangeable methods flag outliers in a numeric column:
//! - IQR: Tukey fences at `Q1 - k*IQR` and `Q3 + k*IQR`
//! - Z-score: `|x - mean| / std` above a cut-off, using the sample std
//!
//! Missing values are excluded from the statistics and never flagged.

use crate::config::{AnalysisConfig, OutlierMethod};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::profiler::statistics;
use crate::types::OutlierMask;
use polars::prelude::*;
use tracing::debug;

/// Fence parameters for outlier detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierParams {
    pub iqr_multiplier: f64,
    pub zscore_threshold: f64,
}

impl Default for OutlierParams {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            zscore_threshold: 3.0,
        }
    }
}

impl From<&AnalysisConfig> for OutlierParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            iqr_multiplier: config.iqr_multiplier,
            zscore_threshold: config.zscore_threshold,
        }
    }
}

/// Lower and upper IQR fences for a numeric column.
///
/// `None` when there are no values.
pub fn iqr_bounds(values: &Float64Chunked, multiplier: f64) -> PolarsResult<Option<(f64, f64)>> {
    Ok(statistics::quartiles(values)?.map(|(q1, q3)| {
        let iqr = q3 - q1;
        (q1 - multiplier * iqr, q3 + multiplier * iqr)
    }))
}

/// Handles outlier detection.
pub struct OutlierDetector;

impl OutlierDetector {
    /// Flag outliers in `column` with the given method.
    ///
    /// Fails with `ColumnNotFound` for an unknown column and `TypeMismatch`
    /// for a non-numeric one.
    pub fn detect(
        dataset: &Dataset,
        column: &str,
        method: OutlierMethod,
        params: &OutlierParams,
    ) -> Result<OutlierMask> {
        let values = statistics::to_float(dataset.numeric_series(column)?)?;

        let bounds = match method {
            OutlierMethod::Iqr => iqr_bounds(&values, params.iqr_multiplier)?,
            OutlierMethod::Zscore => Self::zscore_bounds(&values, params.zscore_threshold),
        };

        let flags = match (method, bounds) {
            (_, None) => vec![false; values.len()],
            (OutlierMethod::Iqr, Some((lower, upper))) => values
                .into_iter()
                .map(|v| v.is_some_and(|x| x < lower || x > upper))
                .collect(),
            (OutlierMethod::Zscore, Some(_)) => {
                Self::zscore_flags(&values, params.zscore_threshold)
            }
        };

        let mask = OutlierMask {
            column: column.to_string(),
            method,
            flags,
            lower_bound: bounds.map(|(lower, _)| lower),
            upper_bound: bounds.map(|(_, upper)| upper),
        };

        debug!(
            "Flagged {} outliers in '{}' using {}",
            mask.outlier_count(),
            column,
            method
        );
        Ok(mask)
    }

    /// Same as [`OutlierDetector::detect`] with the method given as text.
    pub fn detect_str(
        dataset: &Dataset,
        column: &str,
        method: &str,
        params: &OutlierParams,
    ) -> Result<OutlierMask> {
        let method: OutlierMethod = method.parse()?;
        Self::detect(dataset, column, method, params)
    }

    /// `mean -/+ threshold * std`, or `None` when the std is zero or
    /// undefined (nothing can be flagged).
    fn zscore_bounds(values: &Float64Chunked, threshold: f64) -> Option<(f64, f64)> {
        let mean = values.mean()?;
        let std = statistics::sample_std(values)?;
        if std == 0.0 || !std.is_finite() {
            return None;
        }
        Some((mean - threshold * std, mean + threshold * std))
    }

    fn zscore_flags(values: &Float64Chunked, threshold: f64) -> Vec<bool> {
        let (Some(mean), Some(std)) = (values.mean(), statistics::sample_std(values)) else {
            return vec![false; values.len()];
        };

        values
            .into_iter()
            .map(|v| v.is_some_and(|x| ((x - mean) / std).abs() > threshold))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use polars::prelude::*;

    fn dataset(frame: DataFrame) -> Dataset {
        Dataset::new(frame).unwrap()
    }

    fn detect(ds: &Dataset, column: &str, method: OutlierMethod) -> OutlierMask {
        OutlierDetector::detect(ds, column, method, &OutlierParams::default()).unwrap()
    }

    #[test]
    fn test_iqr_flags_extreme_value() {
        let ds = dataset(df! { "x" => [1.0, 2.0, 3.0, 4.0, 100.0] }.unwrap());
        let mask = detect(&ds, "x", OutlierMethod::Iqr);

        assert_eq!(mask.flags, vec![false, false, false, false, true]);
        assert_eq!(mask.lower_bound, Some(-1.0));
        assert_eq!(mask.upper_bound, Some(7.0));
    }

    #[test]
    fn test_zscore_does_not_flag_small_sample() {
        // std is inflated by the extreme value itself: z(100) ~ 1.79
        let ds = dataset(df! { "x" => [1.0, 2.0, 3.0, 4.0, 100.0] }.unwrap());
        let mask = detect(&ds, "x", OutlierMethod::Zscore);
        assert_eq!(mask.outlier_count(), 0);
        assert_eq!(mask.len(), 5);
    }

    #[test]
    fn test_zscore_flags_large_deviation() {
        let mut values = vec![10.0; 30];
        values.push(1000.0);
        values[0] = 11.0;
        let ds = dataset(df! { "x" => values }.unwrap());
        let mask = detect(&ds, "x", OutlierMethod::Zscore);
        assert_eq!(mask.indices(), vec![30]);
    }

    #[test]
    fn test_constant_column_has_no_outliers() {
        let ds = dataset(df! { "x" => [5i64, 5, 5, 5] }.unwrap());
        assert_eq!(detect(&ds, "x", OutlierMethod::Iqr).outlier_count(), 0);

        let z = detect(&ds, "x", OutlierMethod::Zscore);
        assert_eq!(z.outlier_count(), 0);
        assert_eq!(z.lower_bound, None);
    }

    #[test]
    fn test_missing_values_never_flagged() {
        let ds = dataset(df! { "x" => [Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), Some(100.0)] }.unwrap());
        let mask = detect(&ds, "x", OutlierMethod::Iqr);
        assert_eq!(mask.flags, vec![false, false, false, false, false, true]);
    }

    #[test]
    fn test_all_missing_column() {
        let ds = dataset(df! { "x" => [None::<f64>, None] }.unwrap());
        let mask = detect(&ds, "x", OutlierMethod::Iqr);
        assert_eq!(mask.flags, vec![false, false]);
        assert_eq!(mask.upper_bound, None);
    }

    #[test]
    fn test_non_numeric_column_is_type_error() {
        let ds = dataset(df! { "name" => ["a", "b"] }.unwrap());
        let err = OutlierDetector::detect(&ds, "name", OutlierMethod::Iqr, &OutlierParams::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::TypeMismatch { .. }));
    }

    #[test]
    fn test_unknown_column_and_method() {
        let ds = dataset(df! { "x" => [1.0, 2.0] }.unwrap());
        let err = OutlierDetector::detect(&ds, "y", OutlierMethod::Iqr, &OutlierParams::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnNotFound(_)));

        let err = OutlierDetector::detect_str(&ds, "x", "isolation", &OutlierParams::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidMethod(_)));
    }

    #[test]
    fn test_wide_integer_column() {
        let wide = Series::new("x".into(), &[1i64, 2, 3, 4, 100])
            .cast(&DataType::Int128)
            .unwrap();
        let ds = dataset(DataFrame::new(vec![wide.into()]).unwrap());
        assert_eq!(detect(&ds, "x", OutlierMethod::Iqr).indices(), vec![4]);
    }

    #[test]
    fn test_custom_multiplier_widens_fences() {
        let ds = dataset(df! { "x" => [1.0, 2.0, 3.0, 4.0, 10.0] }.unwrap());
        let default = detect(&ds, "x", OutlierMethod::Iqr);
        assert_eq!(default.outlier_count(), 1);

        let params = OutlierParams {
            iqr_multiplier: 3.0,
            ..Default::default()
        };
        let wide = OutlierDetector::detect(&ds, "x", OutlierMethod::Iqr, &params).unwrap();
        assert_eq!(wide.outlier_count(), 0);
    }
}
