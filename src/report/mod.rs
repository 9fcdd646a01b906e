//! Report rendering.
//!
//! Markdown and JSON report output, including the text bar chart.

pub mod chart;
pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};
