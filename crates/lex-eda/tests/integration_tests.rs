//! Integration tests for the analysis engine.
//!
//! These tests load the CSV fixtures from disk and exercise every operation
//! end to end: loading, health summary, cleaning, outliers, correlation,
//! reports and charts.

use lex_eda::cleaner::handle_missing;
use lex_eda::{
    AnalysisConfig, AnalysisError, ColumnKind, Dataset, MissingStrategy, OutlierMethod,
    ReportGenerator, load_dataset, save_dataset,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> Dataset {
    load_dataset(fixtures_path().join(filename)).expect("Failed to load fixture")
}

fn passengers() -> Dataset {
    load_fixture("passengers.csv")
}

// ============================================================================
// Loading and Health Summary
// ============================================================================

#[test]
fn test_load_and_summarize() {
    let ds = passengers();
    assert_eq!(ds.shape(), (11, 6));

    let kinds: Vec<(String, ColumnKind)> = ds
        .column_kinds()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("id".to_string(), ColumnKind::Numeric),
            ("age".to_string(), ColumnKind::Numeric),
            ("fare".to_string(), ColumnKind::Numeric),
            ("city".to_string(), ColumnKind::Categorical),
            ("survived".to_string(), ColumnKind::Numeric),
            ("notes".to_string(), ColumnKind::Categorical),
        ]
    );

    let summary = ds.health_summary().unwrap();
    assert_eq!(summary.row_count, 11);
    assert_eq!(summary.column_count, 6);
    assert_eq!(summary.duplicate_rows, 1);
    assert!(summary.memory_bytes > 0);

    let missing: Vec<usize> = summary.columns.iter().map(|c| c.missing_count).collect();
    assert_eq!(missing, vec![0, 2, 0, 2, 0, 10]);

    let notes = summary.column("notes").unwrap();
    assert!((notes.missing_percentage - 1000.0 / 11.0).abs() < 1e-9);
}

#[test]
fn test_na_markers_and_nan_are_missing() {
    let ds = load_fixture("readings.csv");
    assert_eq!(ds.kind("reading").unwrap(), ColumnKind::Numeric);

    let summary = ds.health_summary().unwrap();
    assert_eq!(summary.column("reading").unwrap().missing_count, 3);
    assert_eq!(summary.column("status").unwrap().missing_count, 1);
}

#[test]
fn test_load_spreadsheet_first_sheet() {
    let ds = load_fixture("measurements.xlsx");
    assert_eq!(ds.shape(), (4, 4));
    assert_eq!(ds.column_names(), vec!["sample", "weight", "grade", "passed"]);

    // The text "NA" in a numeric column is a missing value, not a label
    assert_eq!(ds.kind("weight").unwrap(), ColumnKind::Numeric);
    let weight: Vec<Option<f64>> = ds
        .series("weight")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(weight, vec![Some(1.5), None, Some(3.0), Some(4.5)]);

    assert_eq!(ds.kind("sample").unwrap(), ColumnKind::Categorical);
    assert_eq!(
        ds.series("passed").unwrap().dtype(),
        &polars::prelude::DataType::Boolean
    );

    let summary = ds.health_summary().unwrap();
    let missing: Vec<usize> = summary.columns.iter().map(|c| c.missing_count).collect();
    assert_eq!(missing, vec![0, 1, 1, 1]);

    let mask = ds.detect_outliers("weight", OutlierMethod::Iqr).unwrap();
    assert_eq!(mask.len(), 4);
}

// ============================================================================
// Missing Values
// ============================================================================

#[test]
fn test_clean_with_mean_drops_sparse_column() {
    let ds = passengers();
    let (cleaned, summary) = ds
        .handle_missing_with_summary(MissingStrategy::Mean, 0.5)
        .unwrap();

    assert_eq!(summary.dropped_columns, vec!["notes".to_string()]);
    assert_eq!(cleaned.shape(), (11, 5));
    assert_eq!(cleaned.health_summary().unwrap().total_missing(), 0);
    assert_eq!(summary.filled_cells, 4);

    // Mode of the categorical column
    let city = cleaned.series("city").unwrap();
    assert_eq!(city.str().unwrap().get(3), Some("Southampton"));

    // Input untouched
    assert_eq!(ds.health_summary().unwrap().total_missing(), 14);
}

#[test]
fn test_clean_with_drop_removes_incomplete_rows() {
    let ds = passengers();
    let cleaned = ds.handle_missing(MissingStrategy::Drop, 0.5).unwrap();
    assert_eq!(cleaned.shape(), (7, 5));
    assert_eq!(cleaned.health_summary().unwrap().total_missing(), 0);
}

#[test]
fn test_threshold_extremes() {
    let ds = passengers();

    let strict = ds.handle_missing(MissingStrategy::Median, 0.0).unwrap();
    assert_eq!(strict.column_names(), vec!["id", "fare", "survived"]);

    let lenient = handle_missing(&ds, "ffill", 1.0).unwrap();
    assert_eq!(lenient.width(), 6);
    assert_eq!(lenient.height(), 11);
}

#[test]
fn test_invalid_strategy() {
    let err = handle_missing(&passengers(), "interpolate", 0.5).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidStrategy(ref s) if s == "interpolate"));
}

#[test]
fn test_cleaned_dataset_round_trips_through_parquet() {
    let dir = tempfile::tempdir().unwrap();
    let cleaned = passengers()
        .handle_missing(MissingStrategy::Median, 0.5)
        .unwrap();

    let path = dir.path().join("clean.parquet");
    save_dataset(&cleaned, &path).unwrap();

    let reloaded = load_dataset(&path).unwrap();
    assert_eq!(reloaded.shape(), cleaned.shape());
    assert!(reloaded.frame().equals_missing(cleaned.frame()));
}

// ============================================================================
// Outliers and Correlation
// ============================================================================

#[test]
fn test_fare_outliers() {
    let ds = passengers();

    let iqr = ds.detect_outliers("fare", OutlierMethod::Iqr).unwrap();
    assert_eq!(iqr.indices(), vec![9]);
    assert_eq!(iqr.len(), 11);

    let config = AnalysisConfig::builder()
        .zscore_threshold(2.5)
        .build()
        .unwrap();
    let z = ds
        .detect_outliers_with("fare", OutlierMethod::Zscore, &config)
        .unwrap();
    assert_eq!(z.indices(), vec![9]);
}

#[test]
fn test_outliers_on_text_column() {
    let err = passengers()
        .detect_outliers("city", OutlierMethod::Iqr)
        .unwrap_err();
    assert_eq!(err.error_code(), "TYPE_MISMATCH");

    let err = passengers()
        .detect_outliers("height", OutlierMethod::Iqr)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::ColumnNotFound(_)));
}

#[test]
fn test_correlation_matrix() {
    let matrix = passengers().correlate().unwrap();
    assert_eq!(matrix.columns, vec!["id", "age", "fare", "survived"]);

    for i in 0..matrix.len() {
        assert_eq!(matrix.values[i][i], 1.0);
        for j in 0..matrix.len() {
            let (a, b) = (matrix.values[i][j], matrix.values[j][i]);
            assert!(a == b || (a.is_nan() && b.is_nan()));
            assert!(a.is_nan() || (-1.0..=1.0).contains(&a));
        }
    }
}

// ============================================================================
// Reports and Charts
// ============================================================================

#[test]
fn test_report_files() {
    let dir = tempfile::tempdir().unwrap();
    let ds = passengers();
    let report = ReportGenerator::build_report("passengers.csv", &ds).unwrap();

    let text_path =
        ReportGenerator::write_text_report(&report, dir.path().join("analysis_report.txt"))
            .unwrap();
    let text = std::fs::read_to_string(text_path).unwrap();
    assert!(text.contains("DATA ANALYSIS REPORT"));
    assert!(text.contains("Shape: 11 rows × 6 columns"));
    assert!(text.contains("  notes: 10 (90.91%)"));

    let json_path = ReportGenerator::write_json_report(&report, dir.path(), "passengers").unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(value["summary"]["row_count"], 11);
    assert_eq!(value["statistics"].as_array().unwrap().len(), 4);
}

#[test]
fn test_plots_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let ds = passengers();

    let columns = vec!["age".to_string(), "fare".to_string()];
    let hist = dir.path().join("distributions.svg");
    lex_eda::plotting::plot_distributions(&ds, Some(&columns[..]), &hist).unwrap();
    assert!(hist.exists());

    let heatmap = dir.path().join("correlation.svg");
    lex_eda::plotting::plot_correlation_matrix(&ds.correlate().unwrap(), &heatmap).unwrap();
    assert!(heatmap.exists());
}

// ============================================================================
// Configuration and Errors
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "missing_threshold": 0.2, "missing_strategy": "forward_fill", "outlier_method": "zscore" }"#,
    )
    .unwrap();

    let config = AnalysisConfig::from_json_file(&path).unwrap();
    assert_eq!(config.missing_threshold, 0.2);
    assert_eq!(config.missing_strategy, MissingStrategy::ForwardFill);
    assert_eq!(config.outlier_method, OutlierMethod::Zscore);
    assert_eq!(config.iqr_multiplier, 1.5);

    std::fs::write(&path, r#"{ "missing_threshold": 2.0 }"#).unwrap();
    let err = AnalysisConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidConfig(_)));
}

#[test]
fn test_loader_errors() {
    let err = load_dataset(fixtures_path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, AnalysisError::FileNotFound(_)));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::write(&path, "a,b\n1,2\n").unwrap();
    let err = load_dataset(&path).unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
}
