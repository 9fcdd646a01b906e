//! cropstats - crop production and yield summaries
//!
//! A CLI tool that loads a static crop dataset, finds the highest and
//! lowest producing crop for each year, computes the average yield of
//! each crop, and writes the result as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable dataset, bad config, write failure, etc.)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use dataset::Dataset;
use models::{Report, ReportMetadata};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Where the effective configuration came from.
enum ConfigSource {
    Explicit(PathBuf),
    CurrentDir,
    Defaults,
    /// The default config file exists but could not be loaded.
    Fallback(anyhow::Error),
}

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so that `verbose` in the file applies
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(effective_log_level(&args, &config));

    info!("cropstats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    log_config_source(&source);

    if let Err(e) = run(&args, &config) {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .cropstats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the dataset path, field names, and report layout.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// `--quiet` always wins; otherwise verbose from either the CLI or the config file.
fn effective_log_level(args: &Args, config: &Config) -> tracing::Level {
    if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::CurrentDir)),
        Ok(None) => Ok((Config::default(), ConfigSource::Defaults)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}

fn log_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
        ConfigSource::CurrentDir => info!("Loaded default config from {}", CONFIG_FILE),
        ConfigSource::Defaults => debug!("No config file found, using defaults"),
        ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
    }
}

/// Load, aggregate, and write the report.
fn run(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Load the dataset
    let dataset_path = PathBuf::from(&config.dataset.path);
    println!("📥 Loading dataset: {}", dataset_path.display());
    let dataset = dataset::load_dataset(&dataset_path, &config.dataset.fields)?;

    if args.dry_run {
        handle_dry_run(&dataset);
        return Ok(());
    }

    // Step 2: Aggregate
    println!("🧮 Aggregating {} records...", dataset.records.len());
    let aggregation = analysis::aggregate(&dataset.records);

    if aggregation.is_empty() {
        warn!("Dataset {} contains no records", dataset.path.display());
    }

    // Step 3: Build the report
    let metadata = ReportMetadata {
        title: config.report.title.clone(),
        dataset: dataset.path.display().to_string(),
        generated_at: Utc::now(),
        records: dataset.stats.records,
        distinct_years: aggregation.years.len(),
        distinct_crops: aggregation.crop_yields.len(),
        malformed_values: dataset.stats.malformed_values,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let report = Report {
        metadata,
        aggregation,
    };

    println!("📝 Generating report...");
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_path = resolve_output_path(args, config);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Summary:");
    println!("   Records: {}", report.metadata.records);
    println!("   Years: {}", report.metadata.distinct_years);
    println!("   Crops: {}", report.metadata.distinct_crops);
    if report.metadata.malformed_values > 0 {
        println!(
            "   Unparseable values (counted as 0): {}",
            report.metadata.malformed_values
        );
    }
    println!(
        "\n✅ Done! Report saved to: {}",
        output_path.display()
    );

    Ok(())
}

/// Handle --dry-run: report what was loaded, write nothing.
fn handle_dry_run(dataset: &Dataset) {
    let aggregation = analysis::aggregate(&dataset.records);
    let stats = &dataset.stats;

    println!("\n🔍 Dry run: dataset checked, no report written.\n");
    println!("   Records: {}", stats.records);
    println!("   Distinct years: {}", aggregation.years.len());
    println!("   Distinct crops: {}", aggregation.crop_yields.len());
    println!("   Numeric values given as text: {}", stats.text_values);
    println!("   Unparseable values (counted as 0): {}", stats.malformed_values);
    println!("   Missing fields: {}", stats.missing_fields);
}

/// The configured output path, with a `.md` default switched to `.json`
/// for JSON output unless `--output` was given.
fn resolve_output_path(args: &Args, config: &Config) -> PathBuf {
    let mut path = PathBuf::from(&config.general.output);

    if args.output.is_none()
        && args.format == OutputFormat::Json
        && path.extension().is_some_and(|ext| ext == "md")
    {
        path.set_extension(args.format.extension());
    }

    path
}
