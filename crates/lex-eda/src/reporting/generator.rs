use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::{DatasetHealthSummary, NumericSummary};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Everything the text, JSON and console reports are rendered from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Where the dataset was loaded from
    pub source: String,
    pub summary: DatasetHealthSummary,
    /// `describe()` statistics, one entry per numeric column
    pub statistics: Vec<NumericSummary>,
}

pub struct ReportGenerator;

impl ReportGenerator {
    /// Collect the health summary and descriptive statistics of a dataset.
    pub fn build_report(source: &str, dataset: &Dataset) -> Result<AnalysisReport> {
        Ok(AnalysisReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source: source.to_string(),
            summary: dataset.health_summary()?,
            statistics: dataset.describe()?,
        })
    }

    /// Plain-text report.
    pub fn render_text(report: &AnalysisReport) -> String {
        let summary = &report.summary;
        let banner = "=".repeat(80);
        let mut out = String::new();

        let _ = writeln!(out, "{}", banner);
        let _ = writeln!(out, "DATA ANALYSIS REPORT");
        let _ = writeln!(out, "{}\n", banner);

        let _ = writeln!(out, "Dataset: {}", report.source);
        let _ = writeln!(
            out,
            "Shape: {} rows × {} columns",
            summary.row_count, summary.column_count
        );
        let _ = writeln!(out, "Memory Usage: {:.2} MB", summary.memory_mb());
        let _ = writeln!(out, "Duplicated Rows: {}\n", summary.duplicate_rows);

        let _ = writeln!(out, "COLUMNS:");
        for col in &summary.columns {
            let _ = writeln!(out, "  - {}", col.name);
        }

        let _ = writeln!(out, "\nMISSING VALUES:");
        for col in &summary.columns {
            let _ = writeln!(
                out,
                "  {}: {} ({:.2}%)",
                col.name, col.missing_count, col.missing_percentage
            );
        }

        let _ = writeln!(out, "\nSTATISTICAL SUMMARY:");
        out.push_str(&format_statistics(&report.statistics));
        out
    }

    /// Write the plain-text report to `path`, creating parent directories.
    pub fn write_text_report(report: &AnalysisReport, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)?;
        file.write_all(Self::render_text(report).as_bytes())?;

        info!("Report saved to {}", path.display());
        Ok(path.to_path_buf())
    }

    /// Write the report as pretty JSON to `<dir>/<stem>_report.json`.
    pub fn write_json_report(
        report: &AnalysisReport,
        dir: impl AsRef<Path>,
        stem: &str,
    ) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let report_path = dir.join(format!("{}_report.json", stem));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }

    /// Console summary with a section per aspect of the dataset.
    pub fn render_summary(report: &AnalysisReport) -> String {
        let summary = &report.summary;
        let mut out = String::new();

        let _ = writeln!(out, "\n{}", "=".repeat(60));
        let _ = writeln!(out, "{:^60}", "DATASET SUMMARY");
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(
            out,
            "\nShape: {} rows × {} columns",
            summary.row_count, summary.column_count
        );
        let _ = writeln!(out, "Memory Usage: {:.2} MB", summary.memory_mb());
        let _ = writeln!(out, "Duplicated Rows: {}", summary.duplicate_rows);

        section(&mut out, "COLUMN INFORMATION");
        let name_width = name_width(summary);
        let _ = writeln!(
            out,
            "{:<name_width$}  {:<12} {:<12} {:>9}",
            "Column", "Dtype", "Kind", "Non-Null"
        );
        for col in &summary.columns {
            let _ = writeln!(
                out,
                "{:<name_width$}  {:<12} {:<12} {:>9}",
                col.name,
                col.dtype,
                col.kind.as_str(),
                summary.row_count - col.missing_count
            );
        }

        section(&mut out, "MISSING VALUES");
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>9} {:>11}",
            "Column", "Count", "Percentage"
        );
        for col in &summary.columns {
            let _ = writeln!(
                out,
                "{:<name_width$}  {:>9} {:>10.2}%",
                col.name, col.missing_count, col.missing_percentage
            );
        }

        section(&mut out, "STATISTICAL SUMMARY");
        out.push_str(&format_statistics(&report.statistics));
        out
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", "-".repeat(60));
    let _ = writeln!(out, "{:^60}", title);
    let _ = writeln!(out, "{}", "-".repeat(60));
}

fn name_width(summary: &DatasetHealthSummary) -> usize {
    summary
        .columns
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0)
        .max("Column".len())
}

// ============================================================================
// Statistics table
// ============================================================================

const STAT_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Render `describe()` statistics as a table: one row per statistic, one
/// column per numeric column. Missing statistics print as `NaN`.
pub fn format_statistics(statistics: &[NumericSummary]) -> String {
    if statistics.is_empty() {
        return "No numeric columns.\n".to_string();
    }

    let cells: Vec<Vec<String>> = statistics
        .iter()
        .map(|s| {
            let values = [
                Some(s.count as f64),
                s.mean,
                s.std,
                s.min,
                s.q1,
                s.median,
                s.q3,
                s.max,
            ];
            values
                .iter()
                .map(|v| match v {
                    Some(v) => format!("{:.6}", v),
                    None => "NaN".to_string(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = statistics
        .iter()
        .zip(&cells)
        .map(|(s, col)| {
            col.iter()
                .map(String::len)
                .chain(std::iter::once(s.column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:<5}", "");
    for (s, width) in statistics.iter().zip(&widths) {
        let _ = write!(out, "  {:>width$}", s.column, width = width);
    }
    out.push('\n');

    for (row, label) in STAT_ROWS.iter().enumerate() {
        let _ = write!(out, "{:<5}", label);
        for (col, width) in cells.iter().zip(&widths) {
            let _ = write!(out, "  {:>width$}", col[row], width = width);
        }
        out.push('\n');
    }
    out
}
