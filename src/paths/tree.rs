//! Organizes flat leaf paths into a hierarchy for browsing and selection.
//!
//! The build phase inserts each dot-separated path into a nested map with an
//! explicit leaf marker. A second pass then re-orders every level to match
//! the key order of the source document, because discovery order (which
//! interleaves keys found across sampled records) is not presentation order.

use indexmap::IndexMap;
use serde_json::Value;

/// One node in the organized hierarchy.
///
/// A `Leaf` is an addressable endpoint; a `Branch` with no children (possible
/// only transiently during construction) is not the same thing as a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum PathNode {
    Branch(IndexMap<String, PathNode>),
    Leaf,
}

/// The organized path hierarchy for one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTree {
    root: IndexMap<String, PathNode>,
}

impl PathTree {
    /// Build a tree from discovered paths, ordered against `source` (the
    /// normalized collection document).
    pub fn organize(paths: &[String], source: &Value) -> PathTree {
        let mut root = IndexMap::new();
        for path in paths {
            let segments: Vec<&str> = path.split('.').collect();
            insert(&mut root, &segments);
        }
        PathTree {
            root: reorder(root, Some(source)),
        }
    }

    /// Top-level entries of the tree.
    pub fn children(&self) -> &IndexMap<String, PathNode> {
        &self.root
    }

    /// Render the tree as a JSON value: branches become objects, leaves
    /// become `null`.
    pub fn to_value(&self) -> Value {
        branch_value(&self.root)
    }
}

fn insert(map: &mut IndexMap<String, PathNode>, segments: &[&str]) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        map.entry(first.to_string()).or_insert(PathNode::Leaf);
        return;
    }
    let node = map
        .entry(first.to_string())
        .or_insert_with(|| PathNode::Branch(IndexMap::new()));
    if matches!(node, PathNode::Leaf) {
        // A longer path through this segment upgrades it to a branch.
        *node = PathNode::Branch(IndexMap::new());
    }
    if let PathNode::Branch(children) = node {
        insert(children, rest);
    }
}

/// Re-order one level to the source document's key order, then recurse.
/// Keys with no counterpart in the source keep their build order and come
/// last.
fn reorder(map: IndexMap<String, PathNode>, source: Option<&Value>) -> IndexMap<String, PathNode> {
    let mut remaining = map;
    let mut ordered = IndexMap::new();
    if let Some(source) = source {
        for key in level_keys(source) {
            if let Some(node) = remaining.shift_remove(&key) {
                let child = child_source(source, &key);
                ordered.insert(key, reorder_node(node, child));
            }
        }
    }
    for (key, node) in remaining {
        let child = source.and_then(|s| child_source(s, &key));
        ordered.insert(key, reorder_node(node, child));
    }
    ordered
}

fn reorder_node(node: PathNode, source: Option<&Value>) -> PathNode {
    match node {
        PathNode::Branch(children) => PathNode::Branch(reorder(children, source)),
        PathNode::Leaf => PathNode::Leaf,
    }
}

/// Key order observed at one level of the source: an object's own keys, or
/// the first element's keys for a list level.
fn level_keys(source: &Value) -> Vec<String> {
    match source {
        Value::Object(map) => map.keys().cloned().collect(),
        Value::Array(items) => items
            .first()
            .and_then(|v| v.as_object())
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn child_source<'a>(source: &'a Value, key: &str) -> Option<&'a Value> {
    match source {
        Value::Object(map) => map.get(key),
        Value::Array(items) => items.first()?.as_object()?.get(key),
        _ => None,
    }
}

fn branch_value(map: &IndexMap<String, PathNode>) -> Value {
    let mut out = serde_json::Map::new();
    for (key, node) in map {
        let value = match node {
            PathNode::Branch(children) => branch_value(children),
            PathNode::Leaf => Value::Null,
        };
        out.insert(key.clone(), value);
    }
    Value::Object(out)
}
