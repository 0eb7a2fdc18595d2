//! Normalized record collections and the JSON/JSONL loader.
//!
//! Every input shape (a JSON array, a bare object, an object already wrapped
//! in a `data` array, or newline-delimited JSON) is normalized into the same
//! `{"data": [records...]}` form. The collection is read-only after loading;
//! everything downstream derives from it.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::paths::{flatten_value, FlattenConfig};

/// Top-level key wrapping the record sequence in the normalized form.
pub const MARKER_KEY: &str = "data";

/// Input shape accepted by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// A single JSON document (object or array).
    Json,
    /// Newline-delimited JSON, one record per line.
    JsonLines,
}

impl SourceFormat {
    /// Pick a format from a file extension; `.jsonl`/`.ndjson` map to
    /// [`SourceFormat::JsonLines`], everything else to [`SourceFormat::Json`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("jsonl") | Some("ndjson") => SourceFormat::JsonLines,
            _ => SourceFormat::Json,
        }
    }
}

/// An immutable, normalized collection of records.
///
/// Internally this is always the object `{"data": [records...]}`, so the
/// discovered paths carry the `data` marker prefix and the tree organizer can
/// navigate the collection exactly like any other document.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    root: Value,
}

impl RecordSet {
    /// Wrap a list of records in the normalized collection form.
    pub fn from_records(records: Vec<Value>) -> Self {
        let mut root = Map::new();
        root.insert(MARKER_KEY.to_string(), Value::Array(records));
        RecordSet {
            root: Value::Object(root),
        }
    }

    /// Normalize a parsed JSON document into a collection.
    ///
    /// - an array becomes the record sequence;
    /// - an object with a `data` array is used as-is;
    /// - an object with a non-array `data` wraps that value as the only record;
    /// - any other object becomes the only record;
    /// - a top-level scalar is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(records) => Ok(Self::from_records(records)),
            Value::Object(mut obj) => {
                if matches!(obj.get(MARKER_KEY), Some(Value::Array(_))) {
                    Ok(RecordSet {
                        root: Value::Object(obj),
                    })
                } else if let Some(inner) = obj.remove(MARKER_KEY) {
                    Ok(Self::from_records(vec![inner]))
                } else {
                    Ok(Self::from_records(vec![Value::Object(obj)]))
                }
            }
            _ => bail!("top-level JSON must be an object or an array"),
        }
    }

    /// Parse and normalize an in-memory buffer.
    ///
    /// Whole-document JSON goes through simd-json first and falls back to
    /// serde_json; JSON Lines are parsed line by line, skipping lines that
    /// fail to parse (a collection with zero valid records is an error).
    pub fn from_slice(buf: &mut Vec<u8>, format: SourceFormat) -> Result<Self> {
        match format {
            SourceFormat::Json => {
                let value: Value = match simd_json::from_slice(buf.as_mut_slice()) {
                    Ok(value) => value,
                    Err(_) => serde_json::from_slice(buf).context("failed to parse JSON")?,
                };
                Self::from_value(value)
            }
            SourceFormat::JsonLines => {
                let content = String::from_utf8_lossy(buf);
                let mut records = Vec::new();
                for line in content.lines() {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    // Invalid lines are skipped, not fatal.
                    if let Ok(value) = serde_json::from_str::<Value>(line) {
                        records.push(value);
                    }
                }
                if records.is_empty() {
                    bail!("no valid JSON records found in JSON Lines input");
                }
                Ok(Self::from_records(records))
            }
        }
    }

    /// Read a source to the end and normalize it.
    pub fn from_reader<R: Read>(mut reader: R, format: SourceFormat) -> Result<Self> {
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .context("failed to read input")?;
        Self::from_slice(&mut buf, format)
    }

    /// The normalized `{"data": [...]}` document.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// The record sequence.
    pub fn records(&self) -> &[Value] {
        match self.root.get(MARKER_KEY) {
            Some(Value::Array(records)) => records,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Advisory structural check for line-delimited sources: the first
    /// record must share at least one leaf path with each of the next nine.
    /// A `false` result is a warning condition, never an error.
    pub fn is_structurally_consistent(&self) -> bool {
        let config = FlattenConfig::default();
        let Some((first, rest)) = self.records().split_first() else {
            return true;
        };
        let first_paths: HashSet<String> = flatten_value(first, &config).into_iter().collect();
        rest.iter().take(9).all(|record| {
            flatten_value(record, &config)
                .iter()
                .any(|path| first_paths.contains(path))
        })
    }
}

/// Strip a leading marker segment from a path.
///
/// Paths produced by discovery address the whole collection (`data.doc_id`);
/// resolution works against individual records, so the marker is a no-op
/// navigation hint that must be dropped first.
pub fn record_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('.').collect();
    if segments.first() == Some(&MARKER_KEY) {
        segments.remove(0);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_input_becomes_records() {
        let set = RecordSet::from_value(json!([{"a": 1}, {"a": 2}])).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[1], json!({"a": 2}));
    }

    #[test]
    fn test_wrapped_input_used_as_is() {
        let set = RecordSet::from_value(json!({"data": [{"a": 1}]})).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_value(), &json!({"data": [{"a": 1}]}));
    }

    #[test]
    fn test_non_array_data_key_wraps_single_record() {
        let set = RecordSet::from_value(json!({"data": {"a": 1}})).unwrap();
        assert_eq!(set.records(), vec![json!({"a": 1})]);
    }

    #[test]
    fn test_bare_object_becomes_single_record() {
        let set = RecordSet::from_value(json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(set.records(), vec![json!({"a": 1, "b": 2})]);
    }

    #[test]
    fn test_scalar_input_rejected() {
        assert!(RecordSet::from_value(json!(42)).is_err());
    }

    #[test]
    fn test_jsonl_skips_invalid_lines() {
        let mut buf = b"{\"a\": 1}\nnot json\n\n{\"a\": 2}\n".to_vec();
        let set = RecordSet::from_slice(&mut buf, SourceFormat::JsonLines).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_jsonl_with_no_valid_records_is_an_error() {
        let mut buf = b"nope\nstill nope\n".to_vec();
        assert!(RecordSet::from_slice(&mut buf, SourceFormat::JsonLines).is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SourceFormat::from_path("x.jsonl"), SourceFormat::JsonLines);
        assert_eq!(SourceFormat::from_path("x.ndjson"), SourceFormat::JsonLines);
        assert_eq!(SourceFormat::from_path("x.json"), SourceFormat::Json);
    }

    #[test]
    fn test_consistency_check() {
        let consistent = RecordSet::from_records(vec![
            json!({"id": 1, "text": "a"}),
            json!({"id": 2}),
        ]);
        assert!(consistent.is_structurally_consistent());

        let disjoint = RecordSet::from_records(vec![
            json!({"id": 1}),
            json!({"something": "else"}),
        ]);
        assert!(!disjoint.is_structurally_consistent());
    }

    #[test]
    fn test_marker_stripping() {
        assert_eq!(record_segments("data.sentence.id"), vec!["sentence", "id"]);
        assert_eq!(record_segments("sentence.id"), vec!["sentence", "id"]);
        assert_eq!(record_segments("database.id"), vec!["database", "id"]);
        assert!(record_segments("data").is_empty());
    }
}
