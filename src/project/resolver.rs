//! Path resolution against a single record.
//!
//! Two resolvers with different list semantics live here. [`resolve`] is the
//! one the projector uses: it carries a working set of matched values and
//! expands through every element of a list-valued node (fan-out), so a path
//! under a repeated field yields all matches. [`resolve_first`] is a
//! preview-only convenience that descends into the first element of any list
//! and never fans out.

use serde_json::Value;

/// Resolve `segments` against one record, expanding through lists.
///
/// Each segment maps the current matches to the next set: an object match
/// contributes its value under the segment key (a list value is spliced in
/// element by element), a list match left over from a previous fan-out is
/// flattened one level without consuming the segment, and anything else
/// contributes nothing. Keys that are absent or JSON `null` are treated the
/// same way: no match.
///
/// Returns `None` when no value is reachable, the single value unwrapped
/// when exactly one match survives, and a list of matches in discovery
/// order otherwise.
pub fn resolve(record: &Value, segments: &[&str]) -> Option<Value> {
    let mut current: Vec<&Value> = vec![record];
    for segment in segments {
        let mut next: Vec<&Value> = Vec::new();
        for matched in &current {
            match matched {
                Value::Object(map) => match map.get(*segment) {
                    None | Some(Value::Null) => {}
                    Some(Value::Array(items)) => next.extend(items.iter()),
                    Some(other) => next.push(other),
                },
                Value::Array(items) => next.extend(items.iter()),
                _ => {}
            }
        }
        if next.is_empty() {
            return None;
        }
        current = next;
    }

    if current.len() == 1 {
        Some(current[0].clone())
    } else {
        Some(Value::Array(current.into_iter().cloned().collect()))
    }
}

/// First-match resolution for previews: descend into the first element of
/// any list instead of fanning out. Not used for tabular projection.
pub fn resolve_first(record: &Value, segments: &[&str]) -> Option<Value> {
    let mut current = record;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) => items.first()?.as_object()?.get(*segment)?,
            _ => return None,
        };
    }
    if current.is_null() {
        None
    } else {
        Some(current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::record_segments;
    use serde_json::json;

    fn resolve_path(record: &Value, path: &str) -> Option<Value> {
        resolve(record, &record_segments(path))
    }

    #[test]
    fn test_fan_out_returns_all_matches() {
        let record = json!({"items": [{"id": 1}, {"id": 2}]});
        assert_eq!(resolve_path(&record, "items.id"), Some(json!([1, 2])));
    }

    #[test]
    fn test_single_match_is_unwrapped() {
        let record = json!({"items": [{"id": 1}]});
        assert_eq!(resolve_path(&record, "items.id"), Some(json!(1)));
    }

    #[test]
    fn test_missing_key_yields_no_value() {
        let record = json!({"other": 1});
        assert_eq!(resolve_path(&record, "foo.bar"), None);
    }

    #[test]
    fn test_null_valued_key_counts_as_missing() {
        let record = json!({"foo": null});
        assert_eq!(resolve_path(&record, "foo"), None);
    }

    #[test]
    fn test_marker_prefix_is_a_no_op() {
        let record = json!({"sentence": {"text": "hi"}});
        assert_eq!(
            resolve_path(&record, "data.sentence.text"),
            resolve_path(&record, "sentence.text"),
        );
    }

    #[test]
    fn test_empty_segments_return_the_record() {
        let record = json!({"a": 1});
        assert_eq!(resolve_path(&record, "data"), Some(record.clone()));
    }

    #[test]
    fn test_scalar_match_contributes_nothing_to_deeper_segments() {
        let record = json!({"a": 5});
        assert_eq!(resolve_path(&record, "a.b"), None);
    }

    #[test]
    fn test_nested_lists_flatten_without_consuming_a_segment() {
        // `groups` fans out to two lists; each is flattened one level while
        // `id` is applied to the members.
        let record = json!({
            "groups": [
                {"members": [{"id": 1}, {"id": 2}]},
                {"members": [{"id": 3}]}
            ]
        });
        assert_eq!(
            resolve_path(&record, "groups.members.id"),
            Some(json!([1, 2, 3]))
        );
    }

    #[test]
    fn test_partial_matches_survive_fan_out() {
        let record = json!({"items": [{"id": 1}, {"name": "x"}, {"id": 3}]});
        assert_eq!(resolve_path(&record, "items.id"), Some(json!([1, 3])));
    }

    #[test]
    fn test_resolve_first_descends_first_element_only() {
        let record = json!({"items": [{"id": 1}, {"id": 2}]});
        assert_eq!(resolve_first(&record, &["items", "id"]), Some(json!(1)));
    }

    #[test]
    fn test_resolve_first_null_safety() {
        let record = json!({"items": []});
        assert_eq!(resolve_first(&record, &["items", "id"]), None);
        assert_eq!(resolve_first(&record, &["absent"]), None);
    }
}
