//! SVG charts for a dataset.
//!
//! - Histograms (30 bins) and box plots laid out three panels per row
//! - An annotated correlation heatmap
//!
//! Without explicit columns, the first `max_columns` numeric columns are
//! plotted.

mod charts;

pub use charts::{coolwarm, BoxStats, Histogram, HISTOGRAM_BINS, PANELS_PER_ROW};

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::CorrelationMatrix;
use crate::utils::present_values;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Figure settings shared by every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    /// How many numeric columns to plot when none are named.
    pub max_columns: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1000,
            max_columns: 6,
        }
    }
}

impl From<&AnalysisConfig> for PlotOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            width: config.plot_width,
            height: config.plot_height,
            max_columns: config.max_plot_columns,
        }
    }
}

impl PlotOptions {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Histogram grid with default options.
pub fn plot_distributions(
    dataset: &Dataset,
    columns: Option<&[String]>,
    path: impl AsRef<Path>,
) -> Result<()> {
    ChartRenderer::default().plot_distributions(dataset, columns, path)
}

/// Box plot grid with default options.
pub fn plot_boxplots(
    dataset: &Dataset,
    columns: Option<&[String]>,
    path: impl AsRef<Path>,
) -> Result<()> {
    ChartRenderer::default().plot_boxplots(dataset, columns, path)
}

/// Correlation heatmap with default options.
pub fn plot_correlation_matrix(matrix: &CorrelationMatrix, path: impl AsRef<Path>) -> Result<()> {
    ChartRenderer::default().plot_correlation_matrix(matrix, path)
}

/// Renders charts to SVG files.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    options: PlotOptions,
}

impl ChartRenderer {
    pub fn new(options: PlotOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// One 30-bin histogram per column.
    ///
    /// Named columns must exist (`ColumnNotFound`) and be numeric
    /// (`TypeMismatch`).
    pub fn plot_distributions(
        &self,
        dataset: &Dataset,
        columns: Option<&[String]>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        let data = self.column_values(dataset, columns)?;
        prepare_output(path)?;
        charts::draw_histograms(&data, path, self.options.size())?;
        info!("Distribution plot saved to {}", path.display());
        Ok(())
    }

    /// One box plot per column, with outliers beyond 1.5 x IQR drawn as points.
    pub fn plot_boxplots(
        &self,
        dataset: &Dataset,
        columns: Option<&[String]>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        let data = self.column_values(dataset, columns)?;
        prepare_output(path)?;
        charts::draw_boxplots(&data, path, self.options.size())?;
        info!("Boxplot saved to {}", path.display());
        Ok(())
    }

    pub fn plot_correlation_matrix(
        &self,
        matrix: &CorrelationMatrix,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        prepare_output(path)?;
        charts::draw_heatmap(matrix, path, self.options.size())?;
        info!("Correlation heatmap saved to {}", path.display());
        Ok(())
    }

    /// Present values of the columns to plot, in order.
    fn column_values(
        &self,
        dataset: &Dataset,
        columns: Option<&[String]>,
    ) -> Result<Vec<(String, Vec<f64>)>> {
        let names: Vec<String> = match columns {
            Some(names) if !names.is_empty() => names.to_vec(),
            _ => dataset
                .numeric_columns()
                .into_iter()
                .take(self.options.max_columns)
                .collect(),
        };

        if names.is_empty() {
            warn!("No numeric columns to plot");
        }

        names
            .into_iter()
            .map(|name| {
                let values = present_values(dataset.numeric_series(&name)?)?;
                Ok((name, values))
            })
            .collect()
    }
}

fn prepare_output(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use polars::prelude::*;

    fn dataset() -> Dataset {
        Dataset::new(
            df! {
                "a" => [1.0, 2.0, 3.0, 4.0, 100.0],
                "b" => [Some(2i64), None, Some(4), Some(3), Some(1)],
                "label" => ["x", "y", "z", "x", "y"],
            }
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_options() {
        let options = PlotOptions::default();
        assert_eq!((options.width, options.height), (1200, 1000));
        assert_eq!(options.max_columns, 6);

        let config = AnalysisConfig::builder().plot_size(640, 480).build().unwrap();
        assert_eq!(PlotOptions::from(&config).size(), (640, 480));
    }

    #[test]
    fn test_default_columns_are_numeric_prefix() {
        let renderer = ChartRenderer::new(PlotOptions {
            max_columns: 1,
            ..Default::default()
        });
        let data = renderer.column_values(&dataset(), None).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].0, "a");
    }

    #[test]
    fn test_named_columns_are_validated() {
        let renderer = ChartRenderer::default();
        let ds = dataset();

        let missing = vec!["nope".to_string()];
        assert!(matches!(
            renderer.column_values(&ds, Some(missing.as_slice())),
            Err(AnalysisError::ColumnNotFound(_))
        ));

        let text = vec!["label".to_string()];
        assert!(matches!(
            renderer.column_values(&ds, Some(text.as_slice())),
            Err(AnalysisError::TypeMismatch { .. })
        ));

        let b = vec!["b".to_string()];
        let data = renderer.column_values(&ds, Some(b.as_slice())).unwrap();
        assert_eq!(data[0].1, vec![2.0, 4.0, 3.0, 1.0]);
    }

    #[test]
    fn test_writes_svg_files() {
        let dir = tempfile::tempdir().unwrap();
        let ds = dataset();

        let hist = dir.path().join("plots/distributions.svg");
        plot_distributions(&ds, None, &hist).unwrap();
        let content = std::fs::read_to_string(&hist).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.contains("Distribution of a"));

        let boxes = dir.path().join("boxplots.svg");
        plot_boxplots(&ds, None, &boxes).unwrap();
        assert!(std::fs::read_to_string(&boxes).unwrap().contains("Boxplot of b"));

        let heatmap = dir.path().join("correlation.svg");
        plot_correlation_matrix(&ds.correlate().unwrap(), &heatmap).unwrap();
        let content = std::fs::read_to_string(&heatmap).unwrap();
        assert!(content.contains("Feature Correlation Matrix"));
        assert!(content.contains("1.00"));
    }
}
