use anyhow::{Context, Result};
use std::io::Write;

use crate::project::table::Table;

/// Writes a projected table as JSON Lines, one row object per line, with
/// keys in column order.
pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        TableWriter { writer }
    }

    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        for row in table.to_json_rows() {
            let line = serde_json::to_string(&row).context("failed to serialize row")?;
            writeln!(self.writer, "{}", line).context("failed to write row")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("failed to flush writer")
    }
}
