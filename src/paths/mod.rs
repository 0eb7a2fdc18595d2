//! Path discovery and organization.
//!
//! This module turns an arbitrarily nested collection into the flat set of
//! addressable leaf paths (`flattener`) and rebuilds those paths into a
//! browsable hierarchy ordered like the source document (`tree`).

pub mod flattener;
pub mod tree;

pub use flattener::{discover_paths, flatten_value, FlattenConfig};
pub use tree::{PathNode, PathTree};
