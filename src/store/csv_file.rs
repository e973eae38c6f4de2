use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use splitledger_core::Row;

use super::{data_row_index, header_row, set_cell, RecordStore, StoreError};

/// Rows kept in a CSV file, header first.
///
/// Every write reads the whole file and rewrites it. A file that does not exist yet reads as an
/// empty store and is created by the first append.
#[derive(Clone, Debug)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        CsvStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, rows: &[Vec<String>]) -> Result<(), StoreError> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        debug!(path = %self.path.display(), rows = rows.len(), "rewrote record file");
        Ok(())
    }
}

impl RecordStore for CsvStore {
    fn read_all(&self) -> Result<Vec<Vec<String>>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    fn append(&mut self, row: &Row) -> Result<(), StoreError> {
        let mut rows = self.read_all()?;
        if rows.is_empty() {
            rows.push(header_row());
        }
        rows.push(row.to_vec());
        self.write_all(&rows)
    }

    fn update_cell(&mut self, row: usize, column: usize, value: &str) -> Result<(), StoreError> {
        let mut rows = self.read_all()?;
        let index = data_row_index(&rows, row, column)?;
        set_cell(&mut rows[index], column, value);
        self.write_all(&rows)
    }

    fn read_cell(&self, row: usize, column: usize) -> Result<Option<String>, StoreError> {
        let rows = self.read_all()?;
        Ok(row
            .checked_sub(1)
            .and_then(|index| rows.get(index))
            .and_then(|cells| cells.get(column))
            .cloned())
    }

    fn delete_row(&mut self, row: usize) -> Result<(), StoreError> {
        let mut rows = self.read_all()?;
        let index = data_row_index(&rows, row, 0)?;
        rows.remove(index);
        self.write_all(&rows)
    }
}
