//! Redundancy filtering over selected paths.
//!
//! Selecting both a container and one of its descendants is redundant: the
//! descendant's value is already inside the container's projected value, so
//! only the topmost selection per branch survives.

use thiserror::Error;

use crate::project::types::PathDescriptor;

/// Zero paths selected. A validation condition for callers, not an internal
/// failure; projecting an empty selection still yields an empty table.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("select at least one field before continuing")]
pub struct EmptySelection;

/// Signal an empty selection to the caller.
pub fn ensure_selection(selected: &[PathDescriptor]) -> Result<(), EmptySelection> {
    if selected.is_empty() {
        Err(EmptySelection)
    } else {
        Ok(())
    }
}

/// Drop every selected path that is a strict descendant of another selected
/// path.
///
/// Candidates are considered shortest-path-first (a stable sort, so ties keep
/// their selection order), and the output preserves that pass's order rather
/// than the raw selection order. A deep child loses to a shallow ancestor no
/// matter which was selected first.
pub fn filter_redundant(selected: &[PathDescriptor]) -> Vec<PathDescriptor> {
    let mut candidates: Vec<&PathDescriptor> = selected.iter().collect();
    candidates.sort_by_key(|descriptor| descriptor.path.len());

    let mut kept: Vec<PathDescriptor> = Vec::new();
    for candidate in candidates {
        let shadowed = kept
            .iter()
            .any(|ancestor| is_strict_ancestor(&ancestor.path, &candidate.path));
        if !shadowed {
            kept.push(candidate.clone());
        }
    }
    kept
}

/// True when `child` extends `parent` across a `.` boundary.
fn is_strict_ancestor(parent: &str, child: &str) -> bool {
    child.len() > parent.len()
        && child.starts_with(parent)
        && child.as_bytes()[parent.len()] == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(pairs: &[(&str, &str)]) -> Vec<PathDescriptor> {
        pairs
            .iter()
            .map(|(label, path)| PathDescriptor::new(*label, *path))
            .collect()
    }

    #[test]
    fn test_child_of_selected_parent_is_dropped() {
        let selected = descriptors(&[
            ("id", "sentence.NE.id"),
            ("doc_id", "doc_id"),
            ("ne", "sentence.NE"),
        ]);
        let kept = filter_redundant(&selected);
        let paths: Vec<&str> = kept.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["doc_id", "sentence.NE"]);
    }

    #[test]
    fn test_output_order_is_length_ascending() {
        let selected = descriptors(&[("long", "alpha.beta"), ("short", "zz")]);
        let kept = filter_redundant(&selected);
        let paths: Vec<&str> = kept.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["zz", "alpha.beta"]);
    }

    #[test]
    fn test_equal_length_ties_keep_selection_order() {
        let selected = descriptors(&[("b", "bb"), ("a", "aa")]);
        let kept = filter_redundant(&selected);
        let paths: Vec<&str> = kept.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["bb", "aa"]);
    }

    #[test]
    fn test_shared_prefix_without_dot_is_not_an_ancestor() {
        let selected = descriptors(&[("a", "sentence"), ("b", "sentences.id")]);
        let kept = filter_redundant(&selected);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_no_survivor_is_a_strict_prefix_of_another() {
        let selected = descriptors(&[
            ("a", "x.y.z"),
            ("b", "x.y"),
            ("c", "x"),
            ("d", "q.r"),
            ("e", "q"),
        ]);
        let kept = filter_redundant(&selected);
        for (i, p) in kept.iter().enumerate() {
            for (j, q) in kept.iter().enumerate() {
                if i != j {
                    assert!(
                        !is_strict_ancestor(&p.path, &q.path),
                        "{} shadows {}",
                        p.path,
                        q.path
                    );
                }
            }
        }
    }

    #[test]
    fn test_ensure_selection() {
        assert_eq!(ensure_selection(&[]), Err(EmptySelection));
        assert!(ensure_selection(&descriptors(&[("a", "a")])).is_ok());
    }
}
