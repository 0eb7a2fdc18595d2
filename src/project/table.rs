//! The flat tabular projection of a collection.
//!
//! One row per record, one column per surviving descriptor, in descriptor
//! order. Resolution failures become `null` cells; a malformed record never
//! aborts the projection of the rest. After projection the table only grows
//! by appending answer columns, never by rewriting projected cells.

use anyhow::{bail, Result};
use serde_json::{Map, Value};

use crate::collection::{record_segments, RecordSet};
use crate::project::filter::filter_redundant;
use crate::project::resolver::resolve;
use crate::project::types::PathDescriptor;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Project the selected paths across every record.
    ///
    /// The selection is redundancy-filtered first, so column order is the
    /// filtered order, not the raw selection order.
    pub fn project(set: &RecordSet, selected: &[PathDescriptor]) -> Table {
        let descriptors = filter_redundant(selected);
        let columns: Vec<String> = descriptors.iter().map(|d| d.label.clone()).collect();

        let segments: Vec<Vec<&str>> = descriptors
            .iter()
            .map(|d| record_segments(&d.path))
            .collect();

        let mut rows = Vec::with_capacity(set.len());
        for record in set.records() {
            let mut cells = Vec::with_capacity(columns.len());
            for path in &segments {
                cells.push(resolve(record, path).unwrap_or(Value::Null));
            }
            rows.push(cells);
        }

        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)
    }

    /// One row as an ordered label → value mapping in column order.
    pub fn row_map(&self, row: usize) -> Option<Map<String, Value>> {
        let cells = self.rows.get(row)?;
        let mut map = Map::new();
        for (column, cell) in self.columns.iter().zip(cells) {
            map.insert(column.clone(), cell.clone());
        }
        Some(map)
    }

    /// Every row re-keyed by column, in column order.
    pub fn to_json_rows(&self) -> Vec<Map<String, Value>> {
        (0..self.rows.len())
            .filter_map(|row| self.row_map(row))
            .collect()
    }

    /// Store a user answer for one row, appending the column on first use.
    ///
    /// A new column is back-filled with `null` for every other row so the
    /// one-row-per-record shape is preserved.
    pub fn record_answer(&mut self, row: usize, column: &str, value: Value) -> Result<()> {
        if row >= self.rows.len() {
            bail!("row {} is out of range for a table of {} rows", row, self.rows.len());
        }
        let index = match self.columns.iter().position(|c| c == column) {
            Some(index) => index,
            None => {
                self.columns.push(column.to_string());
                for cells in &mut self.rows {
                    cells.push(Value::Null);
                }
                self.columns.len() - 1
            }
        };
        self.rows[row][index] = value;
        Ok(())
    }
}
