//! # Lattice - nested-data projection for labeling workbenches
//!
//! A library for turning arbitrarily nested JSON/JSONL record collections
//! into flat, labelable tables: discover every addressable leaf path,
//! organize the paths into a browsable hierarchy, filter redundant
//! selections, and project the survivors into one row per record with
//! fan-out through list-valued nodes.
//!
//! ## Modules
//!
//! - **collection**: the normalized `{"data": [...]}` record collection and
//!   its JSON/JSONL loader
//! - **paths**: leaf path discovery and the display hierarchy
//! - **project**: selection filtering, path resolution, tabular projection
//! - **questions**: annotation questions and answer application
//! - **format** / **export**: display rendering and the upload payload
//!
//! ## Quick Start
//!
//! ### Path discovery
//!
//! ```rust
//! use lattice::{discover_paths, FlattenConfig, PathTree, RecordSet};
//! use serde_json::json;
//!
//! let set = RecordSet::from_records(vec![
//!     json!({"doc_id": 1, "sentence": {"text": "hi", "NE": [{"id": 7}]}}),
//! ]);
//!
//! let paths = discover_paths(&set, &FlattenConfig::default());
//! assert_eq!(
//!     paths,
//!     vec!["data.doc_id", "data.sentence.text", "data.sentence.NE.id"]
//! );
//!
//! // Hierarchy for a selection UI, ordered like the source document.
//! let tree = PathTree::organize(&paths, set.as_value());
//! assert!(tree.children().contains_key("data"));
//! ```
//!
//! ### Projection
//!
//! ```rust
//! use lattice::{PathDescriptor, RecordSet, Table};
//! use serde_json::json;
//!
//! let set = RecordSet::from_records(vec![
//!     json!({"doc_id": 1, "items": [{"id": 1}, {"id": 2}]}),
//!     json!({"doc_id": 2}),
//! ]);
//!
//! let table = Table::project(&set, &[
//!     PathDescriptor::new("doc", "data.doc_id"),
//!     PathDescriptor::new("ids", "data.items.id"),
//! ]);
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.cell(0, "ids"), Some(&json!([1, 2])));
//! assert_eq!(table.cell(1, "ids"), Some(&json!(null)));
//! ```

use anyhow::Result;
use std::io::Read;

pub mod collection;
pub mod export;
pub mod format;
pub mod paths;
pub mod project;
pub mod questions;

// Re-export commonly used types for convenience
pub use collection::{record_segments, RecordSet, SourceFormat, MARKER_KEY};
pub use export::{build_export, DatasetExport, ExportRequest};
pub use format::{convert_to_string, format_value, sanitize_name};
pub use paths::{discover_paths, flatten_value, FlattenConfig, PathNode, PathTree};
pub use project::{
    ensure_selection, filter_redundant, resolve, resolve_first, EmptySelection, PathDescriptor,
    Table, TableWriter,
};
pub use questions::{apply_answer, Answer, AnswerError, Question, QuestionKind};

/// Main entry point: load a JSON/JSONL source and project the selected
/// paths into a table.
pub fn project_source<R: Read>(
    reader: R,
    format: SourceFormat,
    selected: &[PathDescriptor],
) -> Result<Table> {
    let set = RecordSet::from_reader(reader, format)?;
    Ok(Table::project(&set, selected))
}
