//! Reading and writing datasets on disk.
//!
//! The reader is picked from the file extension (case-insensitive):
//! CSV and Parquet go through polars, spreadsheets through calamine.

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result, ResultExt};
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Strings read as missing in CSV files.
pub const CSV_NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "NaN", "null", "NULL", "None", "#N/A", "-NaN", "nan", "n/a",
];

const INFER_SCHEMA_ROWS: usize = 1000;

static EMPTY_CELL: Data = Data::Empty;

/// File formats understood by [`load_dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
    Parquet,
}

impl FileFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            "parquet" => Ok(Self::Parquet),
            _ => Err(AnalysisError::UnsupportedFormat { extension: ext }),
        }
    }
}

/// Load a dataset from disk.
///
/// Fails with `FileNotFound` if the path does not exist and
/// `UnsupportedFormat` for an unknown extension.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AnalysisError::FileNotFound(path.to_path_buf()));
    }

    let frame = match FileFormat::from_path(path)? {
        FileFormat::Csv => load_csv(path)?,
        FileFormat::Spreadsheet => load_spreadsheet(path)?,
        FileFormat::Parquet => ParquetReader::new(File::open(path)?)
            .finish()
            .context("Failed to read Parquet")?,
    };

    let dataset = Dataset::new(frame)?;
    info!(
        "Data loaded successfully. Shape: ({}, {})",
        dataset.height(),
        dataset.width()
    );
    Ok(dataset)
}

/// Write a dataset as CSV or Parquet, picked from the extension.
pub fn save_dataset(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut df = dataset.frame().clone();

    match FileFormat::from_path(path)? {
        FileFormat::Csv => {
            let file = File::create(path)?;
            CsvWriter::new(file)
                .include_header(true)
                .finish(&mut df)
                .context("Failed to write CSV file")?;
        }
        FileFormat::Parquet => {
            let file = File::create(path)?;
            ParquetWriter::new(file)
                .finish(&mut df)
                .context("Failed to write Parquet file")?;
        }
        FileFormat::Spreadsheet => {
            return Err(AnalysisError::UnsupportedFormat {
                extension: path
                    .extension()
                    .and_then(|s| s.to_str())
                    .unwrap_or("")
                    .to_lowercase(),
            });
        }
    }

    info!("Saved dataset to {}", path.display());
    Ok(())
}

// =============================================================================
// CSV
// =============================================================================

fn csv_parse_options() -> CsvParseOptions {
    let markers = CSV_NULL_MARKERS
        .iter()
        .map(|s| PlSmallStr::from(*s))
        .collect();
    CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(markers)))
}

/// Read a CSV file, retrying without quote handling if the first pass fails.
fn load_csv(path: &Path) -> Result<DataFrame> {
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(csv_parse_options().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(csv_parse_options().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .context(format!("Failed to read CSV {}", path.display()))
}

// =============================================================================
// Spreadsheets
// =============================================================================

/// Read the first worksheet, using its first row as the header.
fn load_spreadsheet(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(DataFrame::empty()),
    };

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let names = header_names(header);
    let body: Vec<&[Data]> = rows.collect();
    debug!(
        "Worksheet has {} columns and {} data rows",
        names.len(),
        body.len()
    );

    let columns: Vec<Column> = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&EMPTY_CELL))
                .collect();
            spreadsheet_column(name, &cells).into()
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Header cells as unique column names.
///
/// Blank headers become `Unnamed: <idx>`; repeats get a `.1`, `.2`... suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();

    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {}", idx),
                other => other.to_string().trim().to_string(),
            };
            let base = if base.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                base
            };

            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

/// Build a typed series from a column of cells.
///
/// Error cells and text NA markers count as missing, so they do not stop a
/// column from being numeric. Dates are kept as their serial numbers.
fn spreadsheet_column(name: String, cells: &[&Data]) -> Series {
    let present = || cells.iter().filter(|cell| !is_missing_cell(cell));

    if present().next().is_none() {
        return Series::new_null(name.into(), cells.len());
    }

    if present().all(|cell| cell_number(cell).is_some()) {
        let values: Vec<Option<f64>> = cells.iter().map(|cell| cell_number(cell)).collect();
        return Series::new(name.into(), values);
    }

    if present().all(|cell| matches!(cell, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Bool(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Series::new(name.into(), values);
    }

    let values: Vec<Option<String>> = cells
        .iter()
        .map(|cell| match cell {
            cell if is_missing_cell(cell) => None,
            Data::DateTime(v) => Some(v.as_f64().to_string()),
            other => Some(other.to_string()),
        })
        .collect();
    Series::new(name.into(), values)
}

fn is_missing_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => CSV_NULL_MARKERS.contains(&s.trim()),
        _ => false,
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(v) => Some(*v as f64),
        Data::Float(v) => Some(*v),
        Data::DateTime(v) => Some(v.as_f64()),
        _ => None,
    }
}
