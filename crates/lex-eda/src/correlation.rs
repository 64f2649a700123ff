//! Pearson correlation between numeric columns.
//!
//! Each pair uses pairwise-complete observations: a row missing in either
//! column is skipped for that pair only.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::profiler::statistics;
use crate::types::CorrelationMatrix;
use polars::prelude::cov::pearson_corr;
use polars::prelude::*;
use tracing::debug;

/// A spread within this many ulps of the values' magnitude counts as zero.
const SPREAD_ULPS: f64 = 4.0;

/// Computes correlation matrices.
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// Correlate every numeric column with every other one.
    ///
    /// Non-numeric columns are skipped. Undefined coefficients are `NaN`.
    pub fn correlate(dataset: &Dataset) -> Result<CorrelationMatrix> {
        let columns = dataset.numeric_columns();
        let data = columns
            .iter()
            .map(|name| Ok(statistics::to_float(dataset.series(name)?)?))
            .collect::<Result<Vec<_>>>()?;

        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];

        for (i, x) in data.iter().enumerate() {
            for (j, y) in data.iter().enumerate().skip(i) {
                let r = if i == j {
                    Self::self_correlation(x)
                } else {
                    pearson(x, y)?
                };
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        debug!("Computed {}x{} correlation matrix", n, n);
        Ok(CorrelationMatrix { columns, values })
    }

    /// 1.0, or `NaN` when the column has no usable variance.
    fn self_correlation(x: &Float64Chunked) -> f64 {
        if statistics::count(x) >= 2 && !constant(x) {
            1.0
        } else {
            f64::NAN
        }
    }
}

/// Pearson coefficient over rows where both values are present.
///
/// `NaN` for fewer than two complete rows or when either side is constant.
pub fn pearson(x: &Float64Chunked, y: &Float64Chunked) -> PolarsResult<f64> {
    let complete = &x.is_not_null() & &y.is_not_null();
    let (x, y) = (x.filter(&complete)?, y.filter(&complete)?);

    if x.len() < 2 || constant(&x) || constant(&y) {
        return Ok(f64::NAN);
    }
    Ok(pearson_corr(&x, &y).map_or(f64::NAN, |r| r.clamp(-1.0, 1.0)))
}

/// True when the present values are equal up to rounding at their own scale.
///
/// Scale-free: large offsets such as epoch timestamps keep their spread.
fn constant(values: &Float64Chunked) -> bool {
    let (Some(min), Some(max)) = (values.min(), values.max()) else {
        return true;
    };
    let spread = max - min;
    let magnitude = min.abs().max(max.abs());
    !spread.is_finite() || spread <= SPREAD_ULPS * f64::EPSILON * magnitude
}
