//! Report generation.
//!
//! This module renders the aggregation results as a Markdown report
//! (table plus text bar chart) or as JSON.

use crate::analysis::{crops_without_yield, years_without_max};
use crate::config::ReportConfig;
use crate::models::{Report, ReportMetadata, YearSummary};
use crate::report::chart::BarChart;
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", report.metadata.title));

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    if config.include_table {
        output.push_str(&generate_table_section(&report.aggregation.years));
    }

    if config.include_chart {
        output.push_str(&generate_chart_section(report, config));
    }

    output.push_str(&generate_notes_section(report));

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.records));
    section.push_str(&format!("- **Years:** {}\n", metadata.distinct_years));
    section.push_str(&format!("- **Crops:** {}\n", metadata.distinct_crops));
    if metadata.malformed_values > 0 {
        section.push_str(&format!(
            "- **Unparseable Values (counted as 0):** {}\n",
            metadata.malformed_values
        ));
    }
    section.push_str(&format!(
        "- **Processing Time:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the per-year max/min production table.
fn generate_table_section(years: &[YearSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Table\n\n");

    if years.is_empty() {
        section.push_str("No yearly records were found in the dataset.\n\n");
        return section;
    }

    section.push_str(
        "| Year | Crop with Maximum Production | Crop with Minimum Production |\n",
    );
    section.push_str("|:---:|:---:|:---:|\n");

    for row in years {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&row.year),
            escape_cell(&row.max_crop),
            escape_cell(&row.min_crop)
        ));
    }
    section.push('\n');

    section
}

/// Generate the average yield bar chart section.
fn generate_chart_section(report: &Report, config: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str("## Bar Chart\n\n");

    let chart = BarChart::new(&report.aggregation.crop_yields).with_decimals(config.yield_decimals);
    section.push_str("```text\n");
    section.push_str(&chart.render(config.chart_width));
    section.push_str("\n```\n\n");

    section
}

/// Call out rows whose values come from the zero defaults rather than data.
fn generate_notes_section(report: &Report) -> String {
    let empty_years = years_without_max(&report.aggregation);
    let zero_crops = crops_without_yield(&report.aggregation);

    if empty_years.is_empty() && zero_crops.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Notes\n\n");

    if !empty_years.is_empty() {
        section.push_str(&format!(
            "- No crop had positive production in: {}\n",
            empty_years.join(", ")
        ));
    }
    if !zero_crops.is_empty() {
        section.push_str(&format!(
            "- Average yield is 0 for: {}\n",
            zero_crops.join(", ")
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by cropstats v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
