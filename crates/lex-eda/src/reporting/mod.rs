//! Report generation module.
//!
//! An [`AnalysisReport`] is built once from a dataset and rendered three ways:
//! - a plain-text report file (`report` CLI command)
//! - a pretty JSON file, `<stem>_report.json` (`--json-report`)
//! - a console summary (`summary` CLI command)
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_eda::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report("data/train.csv", &dataset)?;
//! println!("{}", ReportGenerator::render_summary(&report));
//! ReportGenerator::write_text_report(&report, "output/analysis_report.txt")?;
//! ReportGenerator::write_json_report(&report, "output", "train")?;
//! ```

mod generator;

pub use generator::{format_statistics, AnalysisReport, ReportGenerator};
