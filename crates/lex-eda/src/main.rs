//! CLI entry point for the exploratory data analysis toolkit.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use lex_eda::{
    AnalysisConfig, AnalysisResult, ChartRenderer, CleaningSummary, CorrelationMatrix, Dataset,
    MissingStrategy, OutlierMask, OutlierMethod, PlotOptions, ReportGenerator, save_dataset,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI-compatible missing-value strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMissingStrategy {
    /// Fill numeric columns with the mean, others with the mode
    Mean,
    /// Fill numeric columns with the median, others with the mode
    Median,
    /// Propagate the previous value, then back-fill leading gaps
    #[value(alias = "forward_fill", alias = "ffill")]
    ForwardFill,
    /// Drop rows that still contain missing values
    Drop,
}

impl From<CliMissingStrategy> for MissingStrategy {
    fn from(cli: CliMissingStrategy) -> Self {
        match cli {
            CliMissingStrategy::Mean => MissingStrategy::Mean,
            CliMissingStrategy::Median => MissingStrategy::Median,
            CliMissingStrategy::ForwardFill => MissingStrategy::ForwardFill,
            CliMissingStrategy::Drop => MissingStrategy::Drop,
        }
    }
}

/// CLI-compatible outlier method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutlierMethod {
    /// Flag values outside the IQR fences
    Iqr,
    /// Flag values whose absolute z-score exceeds the threshold
    #[value(alias = "z-score")]
    Zscore,
}

impl From<CliOutlierMethod> for OutlierMethod {
    fn from(cli: CliOutlierMethod) -> Self {
        match cli {
            CliOutlierMethod::Iqr => OutlierMethod::Iqr,
            CliOutlierMethod::Zscore => OutlierMethod::Zscore,
        }
    }
}

/// Chart to render
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlotKind {
    /// Histograms of numeric columns
    Distributions,
    /// Box plots of numeric columns
    Boxplots,
    /// Correlation heatmap
    Correlation,
}

impl PlotKind {
    fn file_name(&self) -> &'static str {
        match self {
            PlotKind::Distributions => "distributions.svg",
            PlotKind::Boxplots => "boxplots.svg",
            PlotKind::Correlation => "correlation_matrix.svg",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "lex-eda",
    author = "Lex Machina Team",
    version,
    about = "Exploratory data analysis for CSV, Excel and Parquet files",
    long_about = "Inspect, clean and chart tabular data.\n\n\
                  EXAMPLES:\n  \
                  # Health summary\n  \
                  lex-eda summary data.csv\n\n  \
                  # Drop columns over 50% missing, fill the rest with medians\n  \
                  lex-eda clean data.csv --strategy median --threshold 0.5 -o clean.csv\n\n  \
                  # Outliers in one column\n  \
                  lex-eda outliers data.csv --column fare --method zscore\n\n  \
                  # Text and JSON reports\n  \
                  lex-eda report data.csv --output-dir reports/ --json-report"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON file with analysis settings; explicit flags take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dataset health summary and descriptive statistics
    Summary {
        /// Dataset to analyze (.csv, .xlsx, .xls, .ods, .parquet)
        input: PathBuf,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Handle missing values and write the cleaned dataset
    Clean {
        input: PathBuf,

        /// Strategy for the remaining missing values
        #[arg(short, long, value_enum)]
        strategy: Option<CliMissingStrategy>,

        /// Drop columns whose missing fraction exceeds this (0.0 - 1.0)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Where to write the result (.csv or .parquet)
        #[arg(short, long)]
        output: PathBuf,

        /// Print the cleaning summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flag outliers in a numeric column
    Outliers {
        input: PathBuf,

        #[arg(short, long)]
        column: String,

        #[arg(short, long, value_enum)]
        method: Option<CliOutlierMethod>,

        /// Print the outlier mask as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pearson correlation between numeric columns
    Correlate {
        input: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Write the plain-text analysis report
    Report {
        input: PathBuf,

        /// Directory for report files (defaults to the configured output dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also write <input_name>_report.json
        #[arg(long)]
        json_report: bool,
    },

    /// Render a chart to SVG
    Plot {
        input: PathBuf,

        #[arg(short, long, value_enum)]
        kind: PlotKind,

        /// Comma-separated numeric columns (defaults to the first few)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Output SVG file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Command {
    /// Whether stdout is reserved for JSON.
    fn json_output(&self) -> bool {
        match self {
            Command::Summary { json, .. }
            | Command::Clean { json, .. }
            | Command::Outliers { json, .. }
            | Command::Correlate { json, .. } => *json,
            Command::Report { .. } | Command::Plot { .. } => false,
        }
    }
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let json_output = cli.command.json_output();

    init_logging(&cli.log_level, cli.quiet, json_output);

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(err) if json_output => {
            // Errors serialize as { code, message }
            println!("{}", serde_json::to_string_pretty(&err)?);
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

fn run(cli: &Cli) -> AnalysisResult<()> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Summary { input, json } => run_summary(input, *json),
        Command::Clean {
            input,
            strategy,
            threshold,
            output,
            json,
        } => {
            let strategy = strategy.map(Into::into).unwrap_or(config.missing_strategy);
            let threshold = threshold.unwrap_or(config.missing_threshold);
            run_clean(input, strategy, threshold, output, *json)
        }
        Command::Outliers {
            input,
            column,
            method,
            json,
        } => {
            let method = method.map(Into::into).unwrap_or(config.outlier_method);
            run_outliers(input, column, method, &config, *json)
        }
        Command::Correlate { input, json } => run_correlate(input, *json),
        Command::Report {
            input,
            output_dir,
            json_report,
        } => {
            let dir = output_dir.clone().unwrap_or_else(|| config.output_dir.clone());
            run_report(input, &dir, &config.report_name, *json_report)
        }
        Command::Plot {
            input,
            kind,
            columns,
            output,
        } => {
            let path = output
                .clone()
                .unwrap_or_else(|| config.output_dir.join(kind.file_name()));
            run_plot(input, *kind, columns, &path, &config)
        }
    }
}

fn load_config(path: Option<&Path>) -> AnalysisResult<AnalysisConfig> {
    match path {
        Some(path) => {
            debug!("Reading configuration from {}", path.display());
            AnalysisConfig::from_json_file(path)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn load(input: &Path) -> AnalysisResult<Dataset> {
    info!("Loading dataset from: {}", input.display());
    Dataset::from_path(input)
}

// =============================================================================
// Commands
// =============================================================================

/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn run_summary(input: &Path, json: bool) -> AnalysisResult<()> {
    let dataset = load(input)?;
    let report = ReportGenerator::build_report(&input.display().to_string(), &dataset)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", ReportGenerator::render_summary(&report));
    }
    Ok(())
}

fn run_clean(
    input: &Path,
    strategy: MissingStrategy,
    threshold: f64,
    output: &Path,
    json: bool,
) -> AnalysisResult<()> {
    let dataset = load(input)?;
    let (cleaned, summary) = dataset.handle_missing_with_summary(strategy, threshold)?;
    save_dataset(&cleaned, output)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_cleaning_summary(&summary, output);
    }
    Ok(())
}

fn run_outliers(
    input: &Path,
    column: &str,
    method: OutlierMethod,
    config: &AnalysisConfig,
    json: bool,
) -> AnalysisResult<()> {
    let dataset = load(input)?;
    let mask = dataset.detect_outliers_with(column, method, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&mask)?);
    } else {
        print_outliers(&mask);
    }
    Ok(())
}

fn run_correlate(input: &Path, json: bool) -> AnalysisResult<()> {
    let dataset = load(input)?;
    let matrix = dataset.correlate()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&matrix)?);
    } else {
        print_correlation(&matrix);
    }
    Ok(())
}

fn run_report(
    input: &Path,
    output_dir: &Path,
    report_name: &str,
    json_report: bool,
) -> AnalysisResult<()> {
    let dataset = load(input)?;
    let report = ReportGenerator::build_report(&input.display().to_string(), &dataset)?;

    let text_path = output_dir.join(format!("{}.txt", report_name));
    ReportGenerator::write_text_report(&report, &text_path)?;
    println!("✓ Report saved to {}", text_path.display());

    if json_report {
        let stem = extract_file_stem(input);
        let json_path = ReportGenerator::write_json_report(&report, output_dir, &stem)?;
        println!("✓ JSON report saved to {}", json_path.display());
    }
    Ok(())
}

fn run_plot(
    input: &Path,
    kind: PlotKind,
    columns: &[String],
    output: &Path,
    config: &AnalysisConfig,
) -> AnalysisResult<()> {
    let dataset = load(input)?;
    let renderer = ChartRenderer::new(PlotOptions::from(config));
    let columns = (!columns.is_empty()).then_some(columns);

    match kind {
        PlotKind::Distributions => renderer.plot_distributions(&dataset, columns, output)?,
        PlotKind::Boxplots => renderer.plot_boxplots(&dataset, columns, output)?,
        PlotKind::Correlation => renderer.plot_correlation_matrix(&dataset.correlate()?, output)?,
    }

    println!("✓ Plot saved to {}", output.display());
    Ok(())
}

// =============================================================================
// Output helpers
// =============================================================================

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

fn print_cleaning_summary(summary: &CleaningSummary, output: &Path) {
    println!();
    println!("{}", "=".repeat(60));
    println!("MISSING VALUES HANDLED ({})", summary.strategy);
    println!("{}", "=".repeat(60));
    println!("  Threshold:       {:.2}", summary.threshold);
    if summary.dropped_columns.is_empty() {
        println!("  Dropped columns: none");
    } else {
        println!("  Dropped columns: {}", summary.dropped_columns.join(", "));
    }
    println!("  Rows:            {} -> {}", summary.rows_before, summary.rows_after);
    println!("  Filled cells:    {}", summary.filled_cells);
    for step in &summary.steps {
        println!("  - {}", step);
    }
    println!("\n✓ Cleaned dataset saved to {}", output.display());
}

fn print_outliers(mask: &OutlierMask) {
    const MAX_LISTED: usize = 20;

    println!(
        "Column '{}' ({}): {} of {} rows flagged",
        mask.column,
        mask.method,
        mask.outlier_count(),
        mask.len()
    );
    if let (Some(lower), Some(upper)) = (mask.lower_bound, mask.upper_bound) {
        println!("  Bounds: [{:.4}, {:.4}]", lower, upper);
    }

    let indices = mask.indices();
    if !indices.is_empty() {
        let listed: Vec<String> = indices
            .iter()
            .take(MAX_LISTED)
            .map(|i| i.to_string())
            .collect();
        let more = indices.len().saturating_sub(MAX_LISTED);
        if more > 0 {
            println!("  Rows: {} ... and {} more", listed.join(", "), more);
        } else {
            println!("  Rows: {}", listed.join(", "));
        }
    }
}

fn print_correlation(matrix: &CorrelationMatrix) {
    if matrix.is_empty() {
        println!("No numeric columns to correlate.");
        return;
    }

    let labels: Vec<String> = matrix.columns.iter().map(|c| truncate_str(c, 12)).collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(6);

    print!("{:<width$}", "");
    for label in &labels {
        print!("  {:>width$}", label);
    }
    println!();

    for (label, row) in labels.iter().zip(&matrix.values) {
        print!("{:<width$}", label);
        for r in row {
            if r.is_nan() {
                print!("  {:>width$}", "NaN");
            } else {
                print!("  {:>width$.2}", r);
            }
        }
        println!();
    }
}
