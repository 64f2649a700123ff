//! Statistical imputation methods.
//!
//! Provides mean, median and mode imputation.

use crate::utils::{fill_nulls_from_row, fill_numeric_nulls, mode_row};
use polars::prelude::*;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill a numeric Series with the mean of its present values.
    pub fn numeric_mean(series: &Series) -> PolarsResult<Option<(Series, f64)>> {
        Self::fill_numeric(series, |s| s.mean())
    }

    /// Fill a numeric Series with the median of its present values.
    pub fn numeric_median(series: &Series) -> PolarsResult<Option<(Series, f64)>> {
        Self::fill_numeric(series, |s| s.median())
    }

    /// Fill any Series with its most frequent present value.
    ///
    /// Ties go to the value seen first. The dtype is preserved.
    pub fn mode(series: &Series) -> PolarsResult<Option<(Series, String)>> {
        if series.null_count() == 0 {
            return Ok(None);
        }

        let Some(row) = mode_row(series)? else {
            return Ok(None);
        };

        let label = series.get(row)?.to_string();
        let filled = fill_nulls_from_row(series, row)?;
        Ok(Some((filled, label)))
    }

    fn fill_numeric(
        series: &Series,
        statistic: fn(&Series) -> Option<f64>,
    ) -> PolarsResult<Option<(Series, f64)>> {
        if series.null_count() == 0 {
            return Ok(None);
        }

        let Some(fill_value) = statistic(series) else {
            return Ok(None);
        };

        Ok(Some((fill_numeric_nulls(series, fill_value)?, fill_value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(series: &Series) -> Vec<Option<f64>> {
        series.f64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_mean_imputation() {
        let series = Series::new("a".into(), &[Some(1.0), None, Some(3.0)]);
        let (filled, value) = StatisticalImputer::numeric_mean(&series).unwrap().unwrap();
        assert_eq!(value, 2.0);
        assert_eq!(floats(&filled), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_median_imputation_on_integers() {
        let series = Series::new("a".into(), &[Some(1i64), Some(2), None, Some(10)]);
        let (filled, value) = StatisticalImputer::numeric_median(&series).unwrap().unwrap();
        assert_eq!(value, 2.0);
        assert_eq!(filled.dtype(), &DataType::Float64);
        assert_eq!(floats(&filled)[2], Some(2.0));
    }

    #[test]
    fn test_numeric_all_missing_is_noop() {
        let series = Series::new("a".into(), &[None::<f64>, None]);
        assert!(StatisticalImputer::numeric_mean(&series).unwrap().is_none());
        assert!(StatisticalImputer::numeric_median(&series).unwrap().is_none());
    }

    #[test]
    fn test_mode_imputation() {
        let series = Series::new("c".into(), &[Some("red"), None, Some("blue"), Some("blue")]);
        let (filled, _) = StatisticalImputer::mode(&series).unwrap().unwrap();
        assert_eq!(filled.str().unwrap().get(1), Some("blue"));
    }

    #[test]
    fn test_mode_tie_uses_first_value() {
        let series = Series::new("c".into(), &[Some("red"), Some("blue"), None]);
        let (filled, _) = StatisticalImputer::mode(&series).unwrap().unwrap();
        assert_eq!(filled.str().unwrap().get(2), Some("red"));
    }

    #[test]
    fn test_mode_boolean_keeps_dtype() {
        let series = Series::new("b".into(), &[Some(true), None, Some(true), Some(false)]);
        let (filled, _) = StatisticalImputer::mode(&series).unwrap().unwrap();
        assert_eq!(filled.dtype(), &DataType::Boolean);
        assert_eq!(filled.bool().unwrap().get(1), Some(true));
    }
}
