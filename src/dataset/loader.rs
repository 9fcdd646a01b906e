//! Dataset loading.
//!
//! Reads a JSON array of crop entries from disk and maps the configured
//! field keys onto [`RawRecord`]s. Numeric fields are kept raw here; the
//! aggregator coerces them.

use crate::analysis::coerce::is_malformed;
use crate::config::FieldNames;
use crate::models::{RawRecord, RawValue};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that make a dataset file unusable.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {} as JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset {} must be a JSON array of records", .path.display())]
    NotAnArray { path: PathBuf },

    #[error("dataset entry {index} is not a JSON object")]
    NotAnObject { index: usize },
}

/// Counters collected while mapping entries to records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of records loaded.
    pub records: usize,
    /// Numeric fields that arrived as strings.
    pub text_values: usize,
    /// Values with no parseable number (these coerce to zero).
    pub malformed_values: usize,
    /// Keys absent from an entry.
    pub missing_fields: usize,
}

/// A loaded dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Where the dataset was read from.
    pub path: PathBuf,
    /// Records in file order.
    pub records: Vec<RawRecord>,
    /// Load counters.
    pub stats: LoadStats,
}

/// Load a dataset file.
pub fn load_dataset(path: &Path, fields: &FieldNames) -> Result<Dataset, DatasetError> {
    info!("Loading dataset from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (records, stats) = parse_dataset(&content, path, fields)?;

    if stats.malformed_values > 0 {
        warn!(
            "{} numeric values in {} could not be parsed and count as 0",
            stats.malformed_values,
            path.display()
        );
    }
    info!("Loaded {} records", stats.records);

    Ok(Dataset {
        path: path.to_path_buf(),
        records,
        stats,
    })
}

/// Parse dataset JSON text into records.
pub fn parse_dataset(
    content: &str,
    path: &Path,
    fields: &FieldNames,
) -> Result<(Vec<RawRecord>, LoadStats), DatasetError> {
    let document: Value = serde_json::from_str(content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = match document {
        Value::Array(entries) => entries,
        _ => {
            return Err(DatasetError::NotAnArray {
                path: path.to_path_buf(),
            })
        }
    };

    let mut stats = LoadStats::default();
    let mut records = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let object = entry
            .as_object()
            .ok_or(DatasetError::NotAnObject { index })?;
        records.push(map_entry(index, object, fields, &mut stats));
    }

    stats.records = records.len();
    Ok((records, stats))
}

/// Map one JSON object onto a record, updating the counters.
fn map_entry(
    index: usize,
    object: &Map<String, Value>,
    fields: &FieldNames,
    stats: &mut LoadStats,
) -> RawRecord {
    let year = label_field(index, object, &fields.year, stats);
    let crop_name = label_field(index, object, &fields.crop_name, stats);
    let production = numeric_field(index, object, &fields.production, stats);
    let yield_per_hectare = numeric_field(index, object, &fields.yield_per_hectare, stats);

    RawRecord {
        year,
        crop_name,
        production,
        yield_per_hectare,
    }
}

/// Labels are taken verbatim; numbers keep their JSON text.
fn label_field(
    index: usize,
    object: &Map<String, Value>,
    key: &str,
    stats: &mut LoadStats,
) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            debug!("Entry {}: {:?} is not a label ({})", index, key, other);
            stats.malformed_values += 1;
            String::new()
        }
        None => {
            debug!("Entry {}: missing {:?}", index, key);
            stats.missing_fields += 1;
            String::new()
        }
    }
}

fn numeric_field(
    index: usize,
    object: &Map<String, Value>,
    key: &str,
    stats: &mut LoadStats,
) -> RawValue {
    let raw = object.get(key);
    if raw.is_none() {
        stats.missing_fields += 1;
    }

    let value = RawValue::from_json(raw);
    if value.is_text() {
        stats.text_values += 1;
    }
    if is_malformed(&value) {
        debug!("Entry {}: {:?} = {} counts as 0", index, key, value);
        stats.malformed_values += 1;
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"[
        {
            "Country": "India",
            "Year": "Financial Year (Apr - Mar), 1950",
            "Crop Name": "Arecanut(Processed)",
            "Crop Production (UOM:t(Tonnes))": 7300,
            "Yield Of Crops (UOM:Kg/Ha(KilogramperHectare))": 0.6
        },
        {
            "Country": "India",
            "Year": "Financial Year (Apr - Mar), 1950",
            "Crop Name": "Bajra",
            "Crop Production (UOM:t(Tonnes))": "",
            "Yield Of Crops (UOM:Kg/Ha(KilogramperHectare))": "266"
        }
    ]"#;

    fn parse(content: &str) -> Result<(Vec<RawRecord>, LoadStats), DatasetError> {
        parse_dataset(content, Path::new("test.json"), &FieldNames::default())
    }

    #[test]
    fn test_parse_default_fields() {
        let (records, stats) = parse(SAMPLE).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, "Financial Year (Apr - Mar), 1950");
        assert_eq!(records[0].crop_name, "Arecanut(Processed)");
        assert_eq!(records[0].production, RawValue::Number(7300.0));
        assert_eq!(records[0].yield_per_hectare, RawValue::Number(0.6));
        assert_eq!(records[1].production, RawValue::Text(String::new()));
        assert_eq!(records[1].yield_per_hectare, RawValue::Text("266".to_string()));

        assert_eq!(
            stats,
            LoadStats {
                records: 2,
                text_values: 2,
                malformed_values: 1,
                missing_fields: 0,
            }
        );
    }

    #[test]
    fn test_missing_fields_are_counted() {
        let (records, stats) = parse(r#"[{"Year": 1950}]"#).unwrap();

        assert_eq!(records[0].year, "1950");
        assert_eq!(records[0].crop_name, "");
        assert_eq!(records[0].production, RawValue::Missing);
        assert_eq!(stats.missing_fields, 3);
        assert_eq!(stats.malformed_values, 2);
    }

    #[test]
    fn test_custom_field_names() {
        let fields = FieldNames {
            year: "year".to_string(),
            crop_name: "crop".to_string(),
            production: "tonnes".to_string(),
            yield_per_hectare: "kg_per_ha".to_string(),
        };
        let content = r#"[{"year": "2001", "crop": "Maize", "tonnes": 12, "kg_per_ha": "1500.5"}]"#;

        let (records, stats) = parse_dataset(content, Path::new("custom.json"), &fields).unwrap();
        assert_eq!(records[0].year, "2001");
        assert_eq!(records[0].crop_name, "Maize");
        assert_eq!(records[0].production, RawValue::Number(12.0));
        assert_eq!(stats.malformed_values, 0);
    }

    #[test]
    fn test_empty_array() {
        let (records, stats) = parse("[]").unwrap();
        assert!(records.is_empty());
        assert_eq!(stats, LoadStats::default());
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(matches!(parse("[{"), Err(DatasetError::Parse { .. })));
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(matches!(
            parse(r#"{"Year": "1950"}"#),
            Err(DatasetError::NotAnArray { .. })
        ));
    }

    #[test]
    fn test_rejects_non_object_entry() {
        let err = parse(r#"[{"Year": "1950"}, 3]"#).unwrap_err();
        assert!(matches!(err, DatasetError::NotAnObject { index: 1 }));
        assert_eq!(err.to_string(), "dataset entry 1 is not a JSON object");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = load_dataset(file.path(), &FieldNames::default()).unwrap();
        assert_eq!(dataset.path.as_path(), file.path());
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.stats.records, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load_dataset(&path, &FieldNames::default()).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
