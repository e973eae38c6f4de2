use std::io;

use thiserror::Error;

use splitledger_core::Row;

pub use csv_file::CsvStore;
pub use memory::MemoryStore;

mod csv_file;
mod memory;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not access the record store")]
    Io(#[from] io::Error),
    #[error("the record file is malformed")]
    Csv(#[from] csv::Error),
    #[error("row {row}, column {column} is outside the stored data")]
    OutOfRange { row: usize, column: usize },
    #[error("row {row}, column {column} reads back {found:?} after writing {expected:?}")]
    Verification {
        row: usize,
        column: usize,
        expected: String,
        found: Option<String>,
    },
    #[error("the record store is unavailable: {0}")]
    Unavailable(String),
}

/// A table of string rows with a header on the first row.
///
/// Rows are 1-based with the header on row 1, so the transaction at ledger position `p` lives on
/// row `p + HEADER_OFFSET`. Columns are 0-based in `[date, payer, merchant, amount]` order.
/// Deleting a row shifts every row below it up by one.
pub trait RecordStore {
    /// Every stored row, header first. Rows may be shorter than four cells.
    fn read_all(&self) -> Result<Vec<Vec<String>>, StoreError>;

    /// Adds a row after the last one, writing the header first into an empty store.
    fn append(&mut self, row: &Row) -> Result<(), StoreError>;

    /// Overwrites one cell of a data row.
    fn update_cell(&mut self, row: usize, column: usize, value: &str) -> Result<(), StoreError>;

    /// One cell, or `None` when the coordinates hold nothing.
    fn read_cell(&self, row: usize, column: usize) -> Result<Option<String>, StoreError>;

    /// Removes a data row.
    fn delete_row(&mut self, row: usize) -> Result<(), StoreError>;
}

/// Index into a header-first row vector for a 1-based data row; the header itself is not writable.
fn data_row_index(rows: &[Vec<String>], row: usize, column: usize) -> Result<usize, StoreError> {
    if row < 2 || row > rows.len() || column >= splitledger_core::HEADER.len() {
        return Err(StoreError::OutOfRange { row, column });
    }
    Ok(row - 1)
}

fn set_cell(cells: &mut Vec<String>, column: usize, value: &str) {
    if cells.len() <= column {
        cells.resize(column + 1, String::new());
    }
    cells[column] = value.to_string();
}

fn header_row() -> Vec<String> {
    splitledger_core::HEADER
        .iter()
        .map(|name| name.to_string())
        .collect()
}
