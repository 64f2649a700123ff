//! Result types produced by the analysis engine.

use crate::config::OutlierMethod;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic kind of a column, decided once when a [`crate::Dataset`] is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point values.
    Numeric,
    /// Text, categorical, boolean or temporal values.
    Categorical,
    /// A column with no typed value at all (polars `Null` dtype).
    Missing,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Missing => "missing",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health information for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHealthRecord {
    pub name: String,
    /// Declared storage type, e.g. `i64`, `f64`, `str`.
    pub dtype: String,
    pub kind: ColumnKind,
    pub missing_count: usize,
    /// Missing values as a percentage of the row count (0 for an empty dataset).
    pub missing_percentage: f64,
    /// Inferred type label: `integer`, `float`, `text`, `boolean`,
    /// `temporal` or `empty`.
    pub inferred_type: String,
}

/// Dataset-level health summary. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetHealthSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnHealthRecord>,
    /// Rows identical to an earlier row across all columns.
    pub duplicate_rows: usize,
    /// Approximate in-memory size in bytes. Advisory only.
    pub memory_bytes: usize,
}

impl DatasetHealthSummary {
    /// True when the dataset has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.column_count == 0
    }

    /// Approximate memory usage in megabytes.
    pub fn memory_mb(&self) -> f64 {
        self.memory_bytes as f64 / (1024.0 * 1024.0)
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing_count).sum()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnHealthRecord> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Per-row outlier flags for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierMask {
    pub column: String,
    pub method: OutlierMethod,
    /// One entry per row; `true` marks an outlier. Missing values are `false`.
    pub flags: Vec<bool>,
    /// Values below this are outliers (`None` when nothing can be flagged).
    pub lower_bound: Option<f64>,
    /// Values above this are outliers (`None` when nothing can be flagged).
    pub upper_bound: Option<f64>,
}

impl OutlierMask {
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn outlier_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Row indices flagged as outliers.
    pub fn indices(&self) -> Vec<usize> {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect()
    }
}

/// Pearson correlation between every pair of numeric columns.
///
/// Entries are `NaN` where the coefficient is undefined (zero variance or
/// fewer than two paired observations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major square matrix, `values[i][j]` pairs `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up the coefficient for a pair of columns by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values.get(i)?.get(j).copied()
    }
}

/// Descriptive statistics for a numeric column, over non-missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}
