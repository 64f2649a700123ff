//! Chart geometry and drawing.

use crate::error::{AnalysisError, Result};
use crate::outliers::iqr_bounds;
use crate::profiler::statistics;
use crate::types::CorrelationMatrix;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::{ChunkQuantile, Float64Chunked, NewChunkedArray, PolarsResult};
use std::path::Path;

pub const HISTOGRAM_BINS: usize = 30;
pub const PANELS_PER_ROW: usize = 3;

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);
const MEDIAN_COLOR: RGBColor = RGBColor(255, 127, 14);
const UNDEFINED_COLOR: RGBColor = RGBColor(190, 190, 190);

// Cool-warm diverging map: -1, 0, +1.
const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

fn plot_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Plot(e.to_string())
}

// =============================================================================
// Geometry
// =============================================================================

/// Equal-width histogram bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their range.
    ///
    /// A single distinct value gets a unit-wide range centred on it.
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        let bins = bins.max(1);
        let min = values.iter().copied().min_by(f64::total_cmp)?;
        let max = values.iter().copied().max_by(f64::total_cmp)?;
        let (start, end) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };

        let bin_width = (end - start) / bins as f64;
        let mut counts = vec![0; bins];
        for v in values {
            let idx = ((v - start) / bin_width).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Some(Self {
            start,
            bin_width,
            counts,
        })
    }

    pub fn end(&self) -> f64 {
        self.start + self.bin_width * self.counts.len() as f64
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Five-number summary drawn by a box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value inside the lower 1.5 x IQR fence.
    pub lower_whisker: f64,
    /// Largest value inside the upper 1.5 x IQR fence.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` when there are no values.
    pub fn new(values: &[f64]) -> PolarsResult<Option<Self>> {
        let ca = Float64Chunked::from_slice("values".into(), values);
        let (Some((q1, q3)), Some(median), Some((lower, upper))) = (
            statistics::quartiles(&ca)?,
            ca.median(),
            iqr_bounds(&ca, 1.5)?,
        ) else {
            return Ok(None);
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let inside = || sorted.iter().copied().filter(|v| *v >= lower && *v <= upper);
        let lower_whisker = inside().next().unwrap_or(q1);
        let upper_whisker = inside().last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lower || *v > upper)
            .collect();

        Ok(Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        }))
    }

    fn range(&self) -> (f64, f64) {
        let lo = self
            .outliers
            .iter()
            .copied()
            .fold(self.lower_whisker, f64::min);
        let hi = self
            .outliers
            .iter()
            .copied()
            .fold(self.upper_whisker, f64::max);
        let pad = ((hi - lo) * 0.05).max(0.5);
        (lo - pad, hi + pad)
    }
}

/// Cool-warm colour for a coefficient in [-1, 1]; grey for `NaN`.
pub fn coolwarm(r: f64) -> RGBColor {
    if r.is_nan() {
        return UNDEFINED_COLOR;
    }

    let r = r.clamp(-1.0, 1.0);
    let (from, to, t) = if r < 0.0 {
        (NEUTRAL, COOL, -r)
    } else {
        (NEUTRAL, WARM, r)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

// =============================================================================
// Drawing
// =============================================================================

fn panel_grid<'a>(
    root: &DrawingArea<SVGBackend<'a>, Shift>,
    panels: usize,
) -> Vec<DrawingArea<SVGBackend<'a>, Shift>> {
    let rows = panels.div_ceil(PANELS_PER_ROW).max(1);
    root.split_evenly((rows, PANELS_PER_ROW))
}

/// Histogram grid, one panel per column.
pub fn draw_histograms(
    columns: &[(String, Vec<f64>)],
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    for ((name, values), area) in columns.iter().zip(panel_grid(&root, columns.len())) {
        let Some(hist) = Histogram::new(values, HISTOGRAM_BINS) else {
            area.titled(&format!("Distribution of {} (no data)", name), ("sans-serif", 16))
                .map_err(plot_err)?;
            continue;
        };

        let y_max = (hist.max_count() as f64 * 1.1).max(1.0);
        let mut chart = ChartBuilder::on(&area)
            .caption(format!("Distribution of {}", name), ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(hist.start..hist.end(), 0f64..y_max)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc(name.as_str())
            .y_desc("Frequency")
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(hist.counts.iter().enumerate().flat_map(|(i, &count)| {
                let x0 = hist.start + i as f64 * hist.bin_width;
                let corners = [(x0, 0.0), (x0 + hist.bin_width, count as f64)];
                [
                    Rectangle::new(corners, BAR_COLOR.filled()),
                    Rectangle::new(corners, BLACK.stroke_width(1)),
                ]
            }))
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Box plot grid, one panel per column.
pub fn draw_boxplots(columns: &[(String, Vec<f64>)], path: &Path, size: (u32, u32)) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    for ((name, values), area) in columns.iter().zip(panel_grid(&root, columns.len())) {
        let Some(stats) = BoxStats::new(values)? else {
            area.titled(&format!("Boxplot of {} (no data)", name), ("sans-serif", 16))
                .map_err(plot_err)?;
            continue;
        };

        let (lo, hi) = stats.range();
        let mut chart = ChartBuilder::on(&area)
            .caption(format!("Boxplot of {}", name), ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(10)
            .y_label_area_size(55)
            .build_cartesian_2d(0f64..2f64, lo..hi)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_x_axis()
            .y_desc(name.as_str())
            .draw()
            .map_err(plot_err)?;

        let (left, right) = (0.7, 1.3);
        let (cap_left, cap_right) = (0.85, 1.15);

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(left, stats.q1), (right, stats.q3)],
                BLACK.stroke_width(1),
            )))
            .map_err(plot_err)?;

        let segments = vec![
            (vec![(left, stats.median), (right, stats.median)], MEDIAN_COLOR.stroke_width(2)),
            (vec![(1.0, stats.q1), (1.0, stats.lower_whisker)], BLACK.stroke_width(1)),
            (vec![(1.0, stats.q3), (1.0, stats.upper_whisker)], BLACK.stroke_width(1)),
            (
                vec![(cap_left, stats.lower_whisker), (cap_right, stats.lower_whisker)],
                BLACK.stroke_width(1),
            ),
            (
                vec![(cap_left, stats.upper_whisker), (cap_right, stats.upper_whisker)],
                BLACK.stroke_width(1),
            ),
        ];
        chart
            .draw_series(
                segments
                    .into_iter()
                    .map(|(points, style)| PathElement::new(points, style)),
            )
            .map_err(plot_err)?;

        chart
            .draw_series(
                stats
                    .outliers
                    .iter()
                    .map(|&v| Circle::new((1.0, v), 3, BLACK.stroke_width(1))),
            )
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Annotated correlation heatmap.
pub fn draw_heatmap(matrix: &CorrelationMatrix, path: &Path, size: (u32, u32)) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let area = root
        .titled("Feature Correlation Matrix", ("sans-serif", 28))
        .map_err(plot_err)?
        .margin(10, 20, 20, 20);

    let n = matrix.len();
    if n == 0 {
        area.draw(&Text::new(
            "No numeric columns",
            (20, 20),
            ("sans-serif", 18).into_font(),
        ))
        .map_err(plot_err)?;
        root.present().map_err(plot_err)?;
        return Ok(());
    }

    let (width, height) = area.dim_in_pixel();
    let label_space = 130;
    let colorbar_space = 90;
    let cell = ((width as i32 - label_space - colorbar_space) / n as i32)
        .min((height as i32 - label_space) / n as i32)
        .max(4);

    let centred = Pos::new(HPos::Center, VPos::Center);
    let annotation_size = (cell / 4).clamp(8, 18);

    for (i, row) in matrix.values.iter().enumerate() {
        for (j, &r) in row.iter().enumerate() {
            let x0 = label_space + j as i32 * cell;
            let y0 = i as i32 * cell;
            area.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell, y0 + cell)],
                coolwarm(r).filled(),
            ))
            .map_err(plot_err)?;

            let label = if r.is_nan() {
                "nan".to_string()
            } else {
                format!("{:.2}", r)
            };
            let color = if r.abs() > 0.6 { WHITE } else { BLACK };
            let style = TextStyle::from(("sans-serif", annotation_size).into_font())
                .color(&color)
                .pos(centred);
            area.draw(&Text::new(label, (x0 + cell / 2, y0 + cell / 2), style))
                .map_err(plot_err)?;
        }
    }

    let label_style = |pos: Pos| {
        TextStyle::from(("sans-serif", 13).into_font())
            .color(&BLACK)
            .pos(pos)
    };
    for (idx, name) in matrix.columns.iter().enumerate() {
        let name = short_label(name);
        let middle = idx as i32 * cell + cell / 2;
        area.draw(&Text::new(
            name.clone(),
            (label_space - 6, middle),
            label_style(Pos::new(HPos::Right, VPos::Center)),
        ))
        .map_err(plot_err)?;
        area.draw(&Text::new(
            name,
            (label_space + middle, n as i32 * cell + 8),
            label_style(Pos::new(HPos::Center, VPos::Top)),
        ))
        .map_err(plot_err)?;
    }

    draw_colorbar(&area, label_space + n as i32 * cell + 30, n as i32 * cell)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

fn draw_colorbar(area: &DrawingArea<SVGBackend<'_>, Shift>, x: i32, height: i32) -> Result<()> {
    const STEPS: i32 = 40;
    let step = (height / STEPS).max(1);

    for k in 0..STEPS {
        let r = 1.0 - 2.0 * (k as f64 + 0.5) / STEPS as f64;
        area.draw(&Rectangle::new(
            [(x, k * step), (x + 18, (k + 1) * step)],
            coolwarm(r).filled(),
        ))
        .map_err(plot_err)?;
    }

    let style = TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    for (label, y) in [("1.0", 0), ("0.0", STEPS * step / 2), ("-1.0", STEPS * step)] {
        area.draw(&Text::new(label, (x + 24, y), style.clone()))
            .map_err(plot_err)?;
    }
    Ok(())
}

fn short_label(name: &str) -> String {
    if name.chars().count() > 14 {
        let head: String = name.chars().take(13).collect();
        format!("{}…", head)
    } else {
        name.to_string()
    }
}
