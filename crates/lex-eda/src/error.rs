//! Custom error types for the analysis engine.
//!
//! This module provides the error hierarchy using `thiserror`. Core
//! operations report `InvalidStrategy`, `InvalidMethod`, `ColumnNotFound`
//! and `TypeMismatch`; the loader adds `FileNotFound` and
//! `UnsupportedFormat`.
//!
//! Errors are serializable as `{ code, message }` so front ends (the CLI's
//! `--json` mode, or any embedding application) can render them.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for dataset analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File extension is not one of the supported formats.
    #[error("Unsupported file format '{extension}'. Use CSV, Excel, or Parquet")]
    UnsupportedFormat { extension: String },

    /// Unrecognized missing-value strategy.
    #[error("Invalid missing-value strategy '{0}' (expected mean, median, forward_fill or drop)")]
    InvalidStrategy(String),

    /// Unrecognized outlier detection method.
    #[error("Invalid outlier detection method '{0}' (expected iqr or zscore)")]
    InvalidMethod(String),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Operation requires a numeric column.
    #[error("Column '{column}' is {actual}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rendering a chart failed.
    #[error("Failed to render plot: {0}")]
    Plot(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Spreadsheet reader error wrapper.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a [`AnalysisError::TypeMismatch`] on a column that
    /// should have been numeric.
    pub fn not_numeric(column: impl Into<String>, actual: impl Into<String>) -> Self {
        AnalysisError::TypeMismatch {
            column: column.into(),
            expected: "numeric".to_string(),
            actual: actual.into(),
        }
    }

    /// Get a stable error code for front-end handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::InvalidStrategy(_) => "INVALID_STRATEGY",
            Self::InvalidMethod(_) => "INVALID_METHOD",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Plot(_) => "PLOT_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error comes from caller input (a bad path, option or
    /// column name) rather than from the data or the environment.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::FileNotFound(_)
            | Self::UnsupportedFormat { .. }
            | Self::InvalidStrategy(_)
            | Self::InvalidMethod(_)
            | Self::ColumnNotFound(_)
            | Self::TypeMismatch { .. }
            | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_user_error(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for AnalysisError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            AnalysisError::InvalidStrategy("mode".to_string()).error_code(),
            "INVALID_STRATEGY"
        );
        assert_eq!(
            AnalysisError::ColumnNotFound("test".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            AnalysisError::not_numeric("name", "categorical").error_code(),
            "TYPE_MISMATCH"
        );
    }

    #[test]
    fn test_is_user_error() {
        assert!(AnalysisError::InvalidMethod("mad".to_string()).is_user_error());
        assert!(AnalysisError::FileNotFound(PathBuf::from("missing.csv")).is_user_error());
        assert!(!AnalysisError::Plot("backend".to_string()).is_user_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = AnalysisError::ColumnNotFound("Age".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Age"));
    }

    #[test]
    fn test_type_mismatch_message() {
        let error = AnalysisError::not_numeric("city", "categorical");
        assert_eq!(
            error.to_string(),
            "Column 'city' is categorical, expected numeric"
        );
    }

    #[test]
    fn test_with_context() {
        let error = AnalysisError::ColumnNotFound("test".to_string())
            .with_context("During outlier detection");
        assert!(error.to_string().contains("During outlier detection"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert!(error.is_user_error());
    }
}
