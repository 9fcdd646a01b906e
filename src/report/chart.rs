//! Text bar chart of average crop yields.
//!
//! One horizontal bar per crop, in the order the crops are given. Layout is
//! a pure function of the data and the target width, so a resize is just
//! another call to [`BarChart::render`].

use crate::models::CropYieldSummary;

/// Name of the categorical axis.
pub const CATEGORY_AXIS_NAME: &str = "Crop";

/// Name of the value axis.
pub const VALUE_AXIS_NAME: &str = "Average Yield of the Crop between 1950-2020";

const BAR_CHAR: char = '█';

/// A bar chart built from per-crop average yields.
#[derive(Debug, Clone)]
pub struct BarChart<'a> {
    categories: Vec<&'a str>,
    values: Vec<f64>,
    decimals: usize,
}

impl<'a> BarChart<'a> {
    /// Build the category and value axes from the chart rows.
    pub fn new(data: &'a [CropYieldSummary]) -> Self {
        Self {
            categories: data.iter().map(|d| d.crop.as_str()).collect(),
            values: data.iter().map(|d| d.average_yield).collect(),
            decimals: 2,
        }
    }

    /// Set the number of decimal places shown for each value.
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Render the chart into lines at most `width` characters wide.
    ///
    /// Bars are scaled against the largest positive value. Non-positive
    /// values get an empty bar but still show their number. Charts with no
    /// data, or too little room for bars, render as a single placeholder line.
    pub fn render(&self, width: usize) -> String {
        if self.is_empty() {
            return "(no crop yields to chart)".to_string();
        }

        let labels: Vec<String> = self
            .values
            .iter()
            .map(|v| format!("{:.*}", self.decimals, v))
            .collect();

        let label_cap = (width / 3).max(CATEGORY_AXIS_NAME.len());
        let label_width = self
            .categories
            .iter()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(CATEGORY_AXIS_NAME.len(), label_cap);
        let value_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

        // "<label> | <bar> <value>"
        let fixed = label_width + 3 + 1 + value_width;
        if width <= fixed {
            return format!("(chart too narrow to draw {} bars)", self.len());
        }
        let bar_space = width - fixed;

        let max_value = self
            .values
            .iter()
            .copied()
            .filter(|v| *v > 0.0)
            .fold(0.0_f64, f64::max);

        let mut lines = Vec::with_capacity(self.len() + 2);
        lines.push(format!(
            "{:>w$} | {}",
            CATEGORY_AXIS_NAME,
            truncate(VALUE_AXIS_NAME, width - label_width - 3),
            w = label_width
        ));
        lines.push(format!(
            "{}-+-{}",
            "-".repeat(label_width),
            "-".repeat(width - label_width - 3)
        ));

        for ((category, value), label) in self.categories.iter().zip(&self.values).zip(&labels) {
            let bar_len = bar_length(*value, max_value, bar_space);
            lines.push(format!(
                "{:>lw$} | {}{} {:>vw$}",
                truncate(category, label_width),
                BAR_CHAR.to_string().repeat(bar_len),
                " ".repeat(bar_space - bar_len),
                label,
                lw = label_width,
                vw = value_width
            ));
        }

        lines.join("\n")
    }
}

/// Positive values always get at least one cell.
fn bar_length(value: f64, max_value: f64, bar_space: usize) -> usize {
    if value <= 0.0 || max_value <= 0.0 {
        return 0;
    }
    if value.is_infinite() {
        return bar_space;
    }

    let scaled = (value / max_value * bar_space as f64).round() as usize;
    scaled.clamp(1, bar_space)
}

/// Shorten `s` to at most `max` characters, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}
