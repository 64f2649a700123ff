//! Shared utilities for the analysis engine.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use crate::types::ColumnKind;
use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric: any integer width (128-bit included),
/// float or decimal.
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric() || dtype.is_decimal()
}

#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time | DataType::Duration(_)
    )
}

/// Check if a DataType is a dictionary-encoded string type.
#[inline]
pub fn is_dictionary_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Categorical(..) | DataType::Enum(..))
}

/// Map a storage type onto the column kind used by the engine.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if matches!(dtype, DataType::Null) {
        ColumnKind::Missing
    } else {
        ColumnKind::Categorical
    }
}

/// Human-readable type inference label for health records.
pub fn inferred_type_label(dtype: &DataType) -> &'static str {
    if is_float_dtype(dtype) {
        "float"
    } else if dtype.is_decimal() {
        "decimal"
    } else if is_numeric_dtype(dtype) {
        "integer"
    } else if matches!(dtype, DataType::Boolean) {
        "boolean"
    } else if is_datetime_dtype(dtype) {
        "temporal"
    } else if matches!(dtype, DataType::Null) {
        "empty"
    } else {
        "text"
    }
}

// =============================================================================
// Series Value Utilities
// =============================================================================

/// Read a numeric Series as `f64` values, with `None` for missing entries.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Non-missing values of a numeric Series, in row order.
pub fn present_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(numeric_values(series)?.into_iter().flatten().collect())
}

/// Replace `NaN` with null in a floating Series.
///
/// Returns `None` when the Series is not floating or holds no `NaN`.
pub fn nan_to_null(series: &Series) -> PolarsResult<Option<Series>> {
    if !is_float_dtype(series.dtype()) {
        return Ok(None);
    }

    let floats = series.cast(&DataType::Float64)?;
    let ca = floats.f64()?;
    if !ca.into_iter().any(|v| v.is_some_and(f64::is_nan)) {
        return Ok(None);
    }

    let cleaned: Float64Chunked = ca
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(Some(cleaned.with_name(series.name().clone()).into_series()))
}

/// Row index of the first occurrence of the most frequent non-missing value.
///
/// Ties are resolved in favour of the value encountered first.
pub fn mode_row(series: &Series) -> PolarsResult<Option<usize>> {
    // value -> (count, first row)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for i in 0..series.len() {
        let value = series.get(i)?;
        if value.is_null() {
            continue;
        }
        counts.entry(value.to_string()).or_insert((0, i)).0 += 1;
    }

    Ok(counts
        .into_values()
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, row)| row))
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats.f64()?.fill_null_with_values(fill_value)?.into_series())
}

/// Fill null values in any Series with another value of the same Series,
/// keeping the original dtype.
pub fn fill_nulls_from_row(series: &Series, row: usize) -> PolarsResult<Series> {
    let fill = series.get(row)?;
    let mut values = Vec::with_capacity(series.len());
    for i in 0..series.len() {
        let value = series.get(i)?;
        values.push(if value.is_null() { fill.clone() } else { value });
    }

    Series::from_any_values_and_dtype(series.name().clone(), &values, series.dtype(), true)
}

// =============================================================================
// Tests
// =============================================================================
