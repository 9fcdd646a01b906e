//! Data models for crop statistics.
//!
//! This module contains the core data structures used throughout
//! the application for representing dataset records, the derived
//! summaries, and the final report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric field as it arrived in the dataset.
///
/// Datasets are loosely typed: the same column may hold JSON numbers in
/// one entry and strings like `"1234.5"` or `"NA"` in another.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// The value was already a number.
    Number(f64),
    /// The value was a string (possibly malformed).
    Text(String),
    /// The key was absent or held a non-scalar value.
    Missing,
}

impl RawValue {
    /// Convert a JSON value into a raw numeric field.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::Number(n)) => {
                n.as_f64().map_or(RawValue::Missing, RawValue::Number)
            }
            Some(serde_json::Value::String(s)) => RawValue::Text(s.clone()),
            _ => RawValue::Missing,
        }
    }

    /// Returns true if the value came in as a string.
    pub fn is_text(&self) -> bool {
        matches!(self, RawValue::Text(_))
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => write!(f, "{:?}", s),
            RawValue::Missing => write!(f, "<missing>"),
        }
    }
}

/// One dataset entry: a crop's production and yield for a given year.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Year label, e.g. "Financial Year (Apr - Mar), 1950".
    pub year: String,
    /// Crop name.
    pub crop_name: String,
    /// Production in tonnes.
    pub production: RawValue,
    /// Yield in kg/ha.
    pub yield_per_hectare: RawValue,
}

/// Table row: the highest and lowest producing crop of one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: String,
    /// Crop with the highest production, empty if none beat zero.
    pub max_crop: String,
    /// Crop with the lowest production.
    pub min_crop: String,
}

/// Chart row: the average yield of one crop across all years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropYieldSummary {
    pub crop: String,
    pub average_yield: f64,
}

/// Output of a single aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    /// One row per distinct year, in first-seen order.
    pub years: Vec<YearSummary>,
    /// One row per distinct crop, in first-seen order.
    pub crop_yields: Vec<CropYieldSummary>,
}

impl Aggregation {
    /// Returns true if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.crop_yields.is_empty()
    }
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report title.
    pub title: String,
    /// Path of the dataset that was aggregated.
    pub dataset: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records read from the dataset.
    pub records: usize,
    /// Number of distinct years.
    pub distinct_years: usize,
    /// Number of distinct crops.
    pub distinct_crops: usize,
    /// Numeric values that coerced to zero because they could not be parsed.
    pub malformed_values: usize,
    /// Wall time spent loading and aggregating, in seconds.
    pub duration_seconds: f64,
}

/// The complete crop statistics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Derived table and chart data.
    #[serde(flatten)]
    pub aggregation: Aggregation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_value_from_json() {
        assert_eq!(RawValue::from_json(Some(&json!(12.5))), RawValue::Number(12.5));
        assert_eq!(RawValue::from_json(Some(&json!(7))), RawValue::Number(7.0));
        assert_eq!(
            RawValue::from_json(Some(&json!("12.5t"))),
            RawValue::Text("12.5t".to_string())
        );
        assert_eq!(RawValue::from_json(Some(&json!(null))), RawValue::Missing);
        assert_eq!(RawValue::from_json(Some(&json!(true))), RawValue::Missing);
        assert_eq!(RawValue::from_json(None), RawValue::Missing);
    }

    #[test]
    fn test_raw_value_display() {
        assert_eq!(RawValue::Number(3.5).to_string(), "3.5");
        assert_eq!(RawValue::Text("abc".to_string()).to_string(), "\"abc\"");
        assert_eq!(RawValue::Missing.to_string(), "<missing>");
    }

    #[test]
    fn test_summary_serializes_with_boundary_names() {
        let row = YearSummary {
            year: "2000".to_string(),
            max_crop: "Rice".to_string(),
            min_crop: "Jowar".to_string(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, json!({"year": "2000", "maxCrop": "Rice", "minCrop": "Jowar"}));

        let bar = CropYieldSummary {
            crop: "Rice".to_string(),
            average_yield: 1200.5,
        };
        let json = serde_json::to_value(&bar).unwrap();
        assert_eq!(json, json!({"crop": "Rice", "averageYield": 1200.5}));
    }

    #[test]
    fn test_aggregation_is_empty() {
        assert!(Aggregation::default().is_empty());

        let aggregation = Aggregation {
            years: vec![],
            crop_yields: vec![CropYieldSummary {
                crop: "Wheat".to_string(),
                average_yield: 0.0,
            }],
        };
        assert!(!aggregation.is_empty());
    }
}
