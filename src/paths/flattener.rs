//! Leaf path discovery over nested, heterogeneous records.
//!
//! Walks a collection and emits a dot-separated path for every addressable
//! leaf. List-valued nodes are sampled up to a bounded number of elements so
//! the path space stays small on large collections; keys seen in any sampled
//! element are discovered, not just the first element's.

use serde_json::Value;
use std::collections::HashSet;

use crate::collection::RecordSet;

/// Configuration for path discovery.
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// How many elements of a list to inspect when collecting keys.
    ///
    /// Fields that only appear past this cutoff are not discovered. Raising
    /// the limit trades discovery completeness for walk time; it must stay
    /// bounded.
    pub sample_limit: usize,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig { sample_limit: 10 }
    }
}

/// Discover every addressable leaf path in a collection.
///
/// Paths carry the collection's `data` marker prefix. The result is
/// duplicate-free in first-seen order and deterministic for a given input.
pub fn discover_paths(set: &RecordSet, config: &FlattenConfig) -> Vec<String> {
    flatten_value(set.as_value(), config)
}

/// Discover leaf paths in a single value (usually one record).
pub fn flatten_value(value: &Value, config: &FlattenConfig) -> Vec<String> {
    let mut paths = Vec::new();
    walk(value, "", config, &mut paths);
    dedupe(paths)
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn walk(value: &Value, prefix: &str, config: &FlattenConfig, paths: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if map.is_empty() {
                // Nothing deeper to record; the key itself is the terminal.
                paths.push(prefix.to_string());
                return;
            }
            for (key, child) in map {
                walk(child, &join(prefix, key), config, paths);
            }
        }
        Value::Array(items) => {
            if items.is_empty() {
                paths.push(prefix.to_string());
                return;
            }
            // Collect keys across the sampled elements, once each.
            let mut seen: HashSet<String> = HashSet::new();
            for item in items.iter().take(config.sample_limit) {
                match item {
                    Value::Object(map) => {
                        for (key, child) in map {
                            let child_path = join(prefix, key);
                            if seen.insert(child_path.clone()) {
                                walk(child, &child_path, config, paths);
                            }
                        }
                    }
                    Value::Array(_) => walk(item, prefix, config, paths),
                    _ => {
                        // A homogeneous leaf list collapses to a single path.
                        paths.push(prefix.to_string());
                        break;
                    }
                }
            }
        }
        _ => paths.push(prefix.to_string()),
    }
}

fn dedupe(paths: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths_of(set: &RecordSet) -> Vec<String> {
        discover_paths(set, &FlattenConfig::default())
    }

    #[test]
    fn test_nested_record_paths_in_document_order() {
        let set = RecordSet::from_records(vec![json!({
            "doc_id": 7,
            "sentence": {
                "text": "hello",
                "NE": [{"id": 1, "surface": "x"}]
            }
        })]);

        assert_eq!(
            paths_of(&set),
            vec![
                "data.doc_id",
                "data.sentence.text",
                "data.sentence.NE.id",
                "data.sentence.NE.surface",
            ]
        );
    }

    #[test]
    fn test_flattening_is_idempotent() {
        let set = RecordSet::from_records(vec![
            json!({"a": {"b": 1}, "c": [1, 2]}),
            json!({"a": {"d": 2}}),
        ]);
        assert_eq!(paths_of(&set), paths_of(&set));
    }

    #[test]
    fn test_empty_containers_are_terminals() {
        let set = RecordSet::from_records(vec![json!({
            "empty_map": {},
            "empty_list": [],
            "value": 1
        })]);
        assert_eq!(
            paths_of(&set),
            vec!["data.empty_map", "data.empty_list", "data.value"]
        );
    }

    #[test]
    fn test_scalar_list_collapses_to_one_path() {
        let set = RecordSet::from_records(vec![json!({"tags": ["a", "b", "c"]})]);
        assert_eq!(paths_of(&set), vec!["data.tags"]);
    }

    #[test]
    fn test_scalar_element_stops_sampling_at_that_level() {
        // The first scalar ends the walk over this list, so the object that
        // follows it is never inspected.
        let set = RecordSet::from_records(vec![json!({"mixed": [1, {"hidden": 2}]})]);
        assert_eq!(paths_of(&set), vec!["data.mixed"]);
    }

    #[test]
    fn test_keys_from_later_sampled_elements_are_discovered() {
        let set = RecordSet::from_records(vec![
            json!({"id": 1}),
            json!({"id": 2, "note": "only here"}),
        ]);
        assert_eq!(paths_of(&set), vec!["data.id", "data.note"]);
    }

    #[test]
    fn test_sampling_cap_boundary() {
        // `score` at index 9 is inside the default cap of 10; at index 10 it
        // is silently omitted.
        let mut visible: Vec<Value> = (0..15).map(|i| json!({"id": i})).collect();
        visible[9] = json!({"id": 9, "score": 0.5});
        let set = RecordSet::from_records(visible);
        assert!(paths_of(&set).contains(&"data.score".to_string()));

        let mut hidden: Vec<Value> = (0..15).map(|i| json!({"id": i})).collect();
        hidden[10] = json!({"id": 10, "score": 0.5});
        let set = RecordSet::from_records(hidden);
        assert!(!paths_of(&set).contains(&"data.score".to_string()));
    }

    #[test]
    fn test_raised_sample_limit_widens_discovery() {
        let mut records: Vec<Value> = (0..15).map(|i| json!({"id": i})).collect();
        records[12] = json!({"id": 12, "score": 0.5});
        let set = RecordSet::from_records(records);
        let config = FlattenConfig { sample_limit: 15 };
        assert!(discover_paths(&set, &config).contains(&"data.score".to_string()));
    }

    #[test]
    fn test_list_of_lists_recurses_at_same_prefix() {
        let set = RecordSet::from_records(vec![json!({"grid": [[1, 2], [3]]})]);
        assert_eq!(paths_of(&set), vec!["data.grid"]);
    }

    #[test]
    fn test_no_duplicate_paths_across_records() {
        let set = RecordSet::from_records(vec![
            json!({"a": 1, "b": {"c": 2}}),
            json!({"a": 3, "b": {"c": 4}}),
        ]);
        let paths = paths_of(&set);
        let mut unique = paths.clone();
        unique.dedup();
        assert_eq!(paths, unique);
        assert_eq!(paths, vec!["data.a", "data.b.c"]);
    }
}
