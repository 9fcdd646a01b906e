//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.cropstats.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".cropstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "crop_report.md".to_string()
}

/// Dataset input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the dataset JSON file.
    #[serde(default = "default_dataset_path")]
    pub path: String,

    /// Keys of the columns in each dataset entry.
    #[serde(default)]
    pub fields: FieldNames,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            fields: FieldNames::default(),
        }
    }
}

fn default_dataset_path() -> String {
    "Manufac_India_Agro_Dataset.json".to_string()
}

/// Column keys used to read a dataset entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_year_field")]
    pub year: String,

    #[serde(default = "default_crop_field")]
    pub crop_name: String,

    /// Production in tonnes.
    #[serde(default = "default_production_field")]
    pub production: String,

    /// Yield in kg/ha.
    #[serde(default = "default_yield_field")]
    pub yield_per_hectare: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            year: default_year_field(),
            crop_name: default_crop_field(),
            production: default_production_field(),
            yield_per_hectare: default_yield_field(),
        }
    }
}

fn default_year_field() -> String {
    "Year".to_string()
}

fn default_crop_field() -> String {
    "Crop Name".to_string()
}

fn default_production_field() -> String {
    "Crop Production (UOM:t(Tonnes))".to_string()
}

fn default_yield_field() -> String {
    "Yield Of Crops (UOM:Kg/Ha(KilogramperHectare))".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Include the per-year max/min production table.
    #[serde(default = "default_true")]
    pub include_table: bool,

    /// Include the average yield bar chart.
    #[serde(default = "default_true")]
    pub include_chart: bool,

    /// Chart width in columns.
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,

    /// Decimal places shown for average yields.
    #[serde(default = "default_yield_decimals")]
    pub yield_decimals: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_table: true,
            include_chart: true,
            chart_width: default_chart_width(),
            yield_decimals: default_yield_decimals(),
        }
    }
}

fn default_title() -> String {
    "Agriculture Data Visualization".to_string()
}

fn default_true() -> bool {
    true
}

fn default_chart_width() -> usize {
    80
}

fn default_yield_decimals() -> usize {
    2
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.cropstats.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.dataset.path = input.display().to_string();
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(width) = args.chart_width {
            self.report.chart_width = width;
        }

        // Flags only override when set
        if args.no_table {
            self.report.include_table = false;
        }
        if args.no_chart {
            self.report.include_chart = false;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
