//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Smallest chart width that still leaves room for labels and bars.
pub const MIN_CHART_WIDTH: usize = 20;

/// cropstats - yearly crop production and yield summaries
///
/// Reads a crop dataset (JSON array of yearly records), finds the
/// highest and lowest producing crop of every year, and charts the
/// average yield of every crop. Markdown/JSON reports.
///
/// Examples:
///   cropstats --input Manufac_India_Agro_Dataset.json
///   cropstats -i data.json --format json -o summary.json
///   cropstats -i data.json --no-table --chart-width 120
///   cropstats -i data.json --dry-run
///   cropstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset file to aggregate
    ///
    /// JSON array of records. Defaults to the path in .cropstats.toml,
    /// or Manufac_India_Agro_Dataset.json.
    #[arg(short, long, value_name = "FILE", env = "CROPSTATS_DATASET")]
    pub input: Option<PathBuf>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cropstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Width of the average yield chart in columns
    #[arg(long, value_name = "COLS")]
    pub chart_width: Option<usize>,

    /// Leave the max/min production table out of the report
    #[arg(long)]
    pub no_table: bool,

    /// Leave the average yield chart out of the report
    #[arg(long)]
    pub no_chart: bool,

    /// Dry run: load and check the dataset without writing a report
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .cropstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension used for reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(width) = self.chart_width {
            if width < MIN_CHART_WIDTH {
                return Err(format!(
                    "Chart width must be at least {} columns",
                    MIN_CHART_WIDTH
                ));
            }
        }

        if self.no_table && self.no_chart && self.format == OutputFormat::Markdown {
            return Err("Cannot use both --no-table and --no-chart for a Markdown report".to_string());
        }

        // Validate input file if provided
        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!("Dataset file does not exist: {}", input.display()));
            }
            if !input.is_file() {
                return Err(format!("Dataset path is not a file: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
