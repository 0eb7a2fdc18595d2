//! Human-readable rendering of projected values and identifier sanitizing
//! for the export payload.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static NON_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_]").unwrap());

/// Render a value for display: objects as indented `key:value` lines, lists
/// of objects as blank-line-separated blocks, scalar lists comma-joined.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut lines = Vec::new();
            for (key, child) in map {
                match child {
                    Value::Object(_) | Value::Array(_) => {
                        lines.push(format!("{key}:"));
                        for line in format_value(child).lines() {
                            lines.push(format!("    {line}"));
                        }
                    }
                    scalar => lines.push(format!("{key}:{}", display_scalar(scalar))),
                }
            }
            lines.join("\n")
        }
        Value::Array(items) => {
            if items.first().map_or(false, |item| item.is_object()) {
                let blocks: Vec<String> = items
                    .iter()
                    .map(|item| match item {
                        Value::Object(map) => map
                            .iter()
                            .map(|(key, child)| format!("\"{key}\" : {child}"))
                            .collect::<Vec<_>>()
                            .join("\n"),
                        other => display_scalar(other),
                    })
                    .collect();
                blocks.join("\n\n")
            } else {
                items
                    .iter()
                    .map(display_scalar)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
        scalar => display_scalar(scalar),
    }
}

/// Flatten any cell to the string form the annotation service accepts.
/// `null` becomes the empty string.
pub fn convert_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Object(_) | Value::Array(_) => format_value(value),
        other => other.to_string(),
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Reduce a display label to a valid service-side identifier: lowercase,
/// whitespace collapsed to `_`, everything else outside `[a-z0-9_]` removed.
pub fn sanitize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let underscored = WHITESPACE.replace_all(&lowered, "_");
    NON_IDENT.replace_all(&underscored, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Overall Quality"), "overall_quality");
        assert_eq!(sanitize_name("doc_id"), "doc_id");
        assert_eq!(sanitize_name("NE (surface)"), "ne_surface");
    }

    #[test]
    fn test_format_object_indents_nested_containers() {
        let value = json!({"id": 1, "inner": {"a": "x"}});
        assert_eq!(format_value(&value), "id:1\ninner:\n    a:x");
    }

    #[test]
    fn test_format_list_of_objects_as_blocks() {
        let value = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(format_value(&value), "\"id\" : 1\n\n\"id\" : 2");
    }

    #[test]
    fn test_format_scalar_list_comma_joined() {
        assert_eq!(format_value(&json!(["a", "b", 3])), "a, b, 3");
    }

    #[test]
    fn test_convert_to_string_null_is_empty() {
        assert_eq!(convert_to_string(&Value::Null), "");
        assert_eq!(convert_to_string(&json!("plain")), "plain");
        assert_eq!(convert_to_string(&json!(2.5)), "2.5");
    }
}
