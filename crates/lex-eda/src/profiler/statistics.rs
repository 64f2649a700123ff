//! Statistical helpers shared by profiling, outlier detection and plotting.
//!
//! Everything runs on the `Float64` view of a numeric column through the
//! polars aggregation kernels; nulls are skipped by those kernels.

use polars::prelude::*;

/// `Float64` view of a numeric Series.
pub fn to_float(series: &Series) -> PolarsResult<Float64Chunked> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats.f64()?.clone())
}

/// Number of non-missing values.
#[inline]
pub fn count(ca: &Float64Chunked) -> usize {
    ca.len() - ca.null_count()
}

/// Sample standard deviation (n - 1). `None` for fewer than two values.
pub fn sample_std(ca: &Float64Chunked) -> Option<f64> {
    if count(ca) < 2 {
        return None;
    }
    ca.std(1)
}

/// Quantile with linear interpolation between closest ranks
/// (position `p * (n - 1)`).
pub fn quantile(ca: &Float64Chunked, p: f64) -> PolarsResult<Option<f64>> {
    ca.quantile(p, QuantileMethod::Linear)
}

/// First and third quartiles. `None` when there are no values.
pub fn quartiles(ca: &Float64Chunked) -> PolarsResult<Option<(f64, f64)>> {
    Ok(quantile(ca, 0.25)?.zip(quantile(ca, 0.75)?))
}
