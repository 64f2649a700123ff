//! Row-order imputation.

use polars::prelude::*;

/// Fills gaps from neighbouring rows.
pub struct SequentialImputer;

impl SequentialImputer {
    /// Forward fill, then backward fill whatever leading gap remains.
    ///
    /// Returns `None` when the Series has no missing value or no present
    /// value to propagate.
    pub fn forward_fill(series: &Series) -> PolarsResult<Option<Series>> {
        let nulls = series.null_count();
        if nulls == 0 || nulls == series.len() {
            return Ok(None);
        }

        let filled = series.fill_null(FillNullStrategy::Forward(None))?;
        let filled = filled.fill_null(FillNullStrategy::Backward(None))?;
        Ok(Some(filled))
    }
}
