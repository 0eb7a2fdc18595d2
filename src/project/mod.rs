//! Selection filtering, path resolution, and tabular projection.
//!
//! The pipeline: a user-ordered list of [`PathDescriptor`]s is
//! redundancy-filtered, each survivor is resolved per record with fan-out
//! through list-valued nodes, and the results are assembled into a [`Table`]
//! with one row per record and columns in filtered order.

pub mod filter;
pub mod resolver;
pub mod table;
pub mod types;
pub mod writer;

pub use filter::{ensure_selection, filter_redundant, EmptySelection};
pub use resolver::{resolve, resolve_first};
pub use table::Table;
pub use types::PathDescriptor;
pub use writer::TableWriter;
