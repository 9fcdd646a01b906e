//! Crop record aggregation.
//!
//! This module turns the raw dataset records into the two derived views:
//! per-year production extremes (table) and per-crop average yield (chart).

use crate::analysis::coerce::coerce;
use crate::models::{Aggregation, CropYieldSummary, RawRecord, YearSummary};
use std::collections::HashMap;
use tracing::debug;

/// Running production extremes for one year.
struct YearExtremes<'a> {
    year: &'a str,
    max_crop: &'a str,
    max_production: f64,
    min_crop: &'a str,
    min_production: f64,
}

impl<'a> YearExtremes<'a> {
    /// The max scan is seeded at zero, so a year whose productions are all
    /// non-positive reports an empty `max_crop`.
    fn new(year: &'a str) -> Self {
        Self {
            year,
            max_crop: "",
            max_production: 0.0,
            min_crop: "",
            min_production: f64::INFINITY,
        }
    }

    fn observe(&mut self, crop: &'a str, production: f64) {
        if production > self.max_production {
            self.max_production = production;
            self.max_crop = crop;
        }
        if production < self.min_production {
            self.min_production = production;
            self.min_crop = crop;
        }
    }
}

/// Running yield totals for one crop.
struct CropYield<'a> {
    crop: &'a str,
    total_yield: f64,
    valid_count: usize,
}

impl CropYield<'_> {
    /// Every yield goes into the total, but only strictly positive ones
    /// count toward the divisor.
    fn observe(&mut self, yield_per_hectare: f64) {
        self.total_yield += yield_per_hectare;
        if yield_per_hectare > 0.0 {
            self.valid_count += 1;
        }
    }

    fn average(&self) -> f64 {
        if self.valid_count > 0 {
            self.total_yield / self.valid_count as f64
        } else {
            0.0
        }
    }
}

/// Aggregate raw records into the per-year and per-crop summaries.
///
/// Both outputs keep the order in which each year or crop first appears in
/// `records`. Malformed numeric fields count as zero. Pure and infallible.
pub fn aggregate(records: &[RawRecord]) -> Aggregation {
    let mut years: Vec<YearExtremes> = Vec::new();
    let mut year_index: HashMap<&str, usize> = HashMap::new();
    let mut crops: Vec<CropYield> = Vec::new();
    let mut crop_index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let production = coerce(&record.production);
        let yield_per_hectare = coerce(&record.yield_per_hectare);

        let slot = *year_index.entry(record.year.as_str()).or_insert_with(|| {
            years.push(YearExtremes::new(&record.year));
            years.len() - 1
        });
        years[slot].observe(&record.crop_name, production);

        let slot = *crop_index.entry(record.crop_name.as_str()).or_insert_with(|| {
            crops.push(CropYield {
                crop: &record.crop_name,
                total_yield: 0.0,
                valid_count: 0,
            });
            crops.len() - 1
        });
        crops[slot].observe(yield_per_hectare);
    }

    debug!(
        "Aggregated {} records into {} years and {} crops",
        records.len(),
        years.len(),
        crops.len()
    );

    Aggregation {
        years: years
            .into_iter()
            .map(|y| YearSummary {
                year: y.year.to_string(),
                max_crop: y.max_crop.to_string(),
                min_crop: y.min_crop.to_string(),
            })
            .collect(),
        crop_yields: crops
            .into_iter()
            .map(|c| CropYieldSummary {
                crop: c.crop.to_string(),
                average_yield: c.average(),
            })
            .collect(),
    }
}

/// Crops reported with a zero average yield.
pub fn crops_without_yield(aggregation: &Aggregation) -> Vec<&str> {
    aggregation
        .crop_yields
        .iter()
        .filter(|c| c.average_yield == 0.0)
        .map(|c| c.crop.as_str())
        .collect()
}

/// Years where no crop produced more than zero, so no maximum was recorded.
pub fn years_without_max(aggregation: &Aggregation) -> Vec<&str> {
    aggregation
        .years
        .iter()
        .filter(|y| y.max_crop.is_empty())
        .map(|y| y.year.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawValue;

    fn record(year: &str, crop: &str, production: f64, yield_per_hectare: f64) -> RawRecord {
        RawRecord {
            year: year.to_string(),
            crop_name: crop.to_string(),
            production: RawValue::Number(production),
            yield_per_hectare: RawValue::Number(yield_per_hectare),
        }
    }

    fn yield_of(aggregation: &Aggregation, crop: &str) -> Option<f64> {
        aggregation
            .crop_yields
            .iter()
            .find(|c| c.crop == crop)
            .map(|c| c.average_yield)
    }

    #[test]
    fn test_empty_input() {
        let aggregation = aggregate(&[]);
        assert!(aggregation.years.is_empty());
        assert!(aggregation.crop_yields.is_empty());
    }

    #[test]
    fn test_first_seen_order() {
        let records = vec![
            record("1951", "Wheat", 10.0, 1.0),
            record("1950", "Rice", 20.0, 2.0),
            record("1951", "Jowar", 5.0, 3.0),
            record("1950", "Wheat", 30.0, 4.0),
            record("1952", "Rice", 1.0, 5.0),
        ];

        let aggregation = aggregate(&records);

        let years: Vec<_> = aggregation.years.iter().map(|y| y.year.as_str()).collect();
        assert_eq!(years, vec!["1951", "1950", "1952"]);

        let crops: Vec<_> = aggregation
            .crop_yields
            .iter()
            .map(|c| c.crop.as_str())
            .collect();
        assert_eq!(crops, vec!["Wheat", "Rice", "Jowar"]);
    }

    #[test]
    fn test_max_and_min_per_year() {
        let records = vec![
            record("1950", "Wheat", 10.0, 1.0),
            record("1950", "Rice", 20.0, 1.0),
            record("1950", "Jowar", 5.0, 1.0),
        ];

        let aggregation = aggregate(&records);
        assert_eq!(
            aggregation.years,
            vec![YearSummary {
                year: "1950".to_string(),
                max_crop: "Rice".to_string(),
                min_crop: "Jowar".to_string(),
            }]
        );
    }

    #[test]
    fn test_ties_keep_earliest() {
        let records = vec![record("2000", "cropA", 50.0, 1.0), record("2000", "cropB", 50.0, 1.0)];

        let aggregation = aggregate(&records);
        assert_eq!(aggregation.years[0].max_crop, "cropA");
        assert_eq!(aggregation.years[0].min_crop, "cropA");
    }

    #[test]
    fn test_zero_production_leaves_max_empty() {
        let aggregation = aggregate(&[record("1999", "cropX", 0.0, 1.0)]);
        assert_eq!(aggregation.years[0].max_crop, "");
        assert_eq!(aggregation.years[0].min_crop, "cropX");
    }

    #[test]
    fn test_negative_production_leaves_max_empty() {
        let records = vec![record("1999", "cropX", -4.0, 1.0), record("1999", "cropY", -9.0, 1.0)];

        let aggregation = aggregate(&records);
        assert_eq!(aggregation.years[0].max_crop, "");
        assert_eq!(aggregation.years[0].min_crop, "cropY");
        assert_eq!(years_without_max(&aggregation), vec!["1999"]);
    }

    #[test]
    fn test_average_sums_all_but_counts_positive() {
        let records = vec![
            record("1950", "cropY", 1.0, 10.0),
            record("1951", "cropY", 1.0, -5.0),
            record("1952", "cropY", 1.0, 0.0),
        ];

        let aggregation = aggregate(&records);
        assert_eq!(yield_of(&aggregation, "cropY"), Some(5.0));
    }

    #[test]
    fn test_no_positive_yield_averages_zero() {
        let records = vec![record("1950", "cropZ", 1.0, 0.0), record("1951", "cropZ", 1.0, -3.0)];

        let aggregation = aggregate(&records);
        assert_eq!(yield_of(&aggregation, "cropZ"), Some(0.0));
        assert_eq!(crops_without_yield(&aggregation), vec!["cropZ"]);
    }

    #[test]
    fn test_string_values_are_coerced() {
        let records = vec![
            RawRecord {
                year: "1950".to_string(),
                crop_name: "Rice".to_string(),
                production: RawValue::Text("123.45abc".to_string()),
                yield_per_hectare: RawValue::Text("800".to_string()),
            },
            RawRecord {
                year: "1950".to_string(),
                crop_name: "Wheat".to_string(),
                production: RawValue::Text("abc".to_string()),
                yield_per_hectare: RawValue::Text("".to_string()),
            },
            RawRecord {
                year: "1950".to_string(),
                crop_name: "Rice".to_string(),
                production: RawValue::Missing,
                yield_per_hectare: RawValue::Number(1200.0),
            },
        ];

        let aggregation = aggregate(&records);
        assert_eq!(aggregation.years[0].max_crop, "Rice");
        assert_eq!(aggregation.years[0].min_crop, "Wheat");
        assert_eq!(yield_of(&aggregation, "Rice"), Some(1000.0));
        assert_eq!(yield_of(&aggregation, "Wheat"), Some(0.0));
    }

    #[test]
    fn test_counts_match_distinct_keys() {
        let records: Vec<_> = (0..40)
            .map(|i| {
                record(
                    &format!("{}", 1950 + i % 7),
                    &format!("crop{}", i % 5),
                    i as f64,
                    (i % 3) as f64,
                )
            })
            .collect();

        let aggregation = aggregate(&records);
        assert_eq!(aggregation.years.len(), 7);
        assert_eq!(aggregation.crop_yields.len(), 5);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record("1950", "Wheat", 10.0, 1.5),
            record("1951", "Rice", 0.0, -2.0),
            record("1950", "Rice", 7.0, 3.0),
        ];

        assert_eq!(aggregate(&records), aggregate(&records));
    }
}
