use splitledger_core::Row;

use super::{data_row_index, header_row, set_cell, RecordStore, StoreError};

/// Rows kept in a vector.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryStore {
    rows: Vec<Vec<String>>,
}

impl MemoryStore {
    /// A store holding only the header row.
    pub fn new() -> Self {
        MemoryStore {
            rows: vec![header_row()],
        }
    }

    /// A store holding exactly `rows`, which should start with a header.
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemoryStore {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

impl RecordStore for MemoryStore {
    fn read_all(&self) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.rows.clone())
    }

    fn append(&mut self, row: &Row) -> Result<(), StoreError> {
        if self.rows.is_empty() {
            self.rows.push(header_row());
        }
        self.rows.push(row.to_vec());
        Ok(())
    }

    fn update_cell(&mut self, row: usize, column: usize, value: &str) -> Result<(), StoreError> {
        let index = data_row_index(&self.rows, row, column)?;
        set_cell(&mut self.rows[index], column, value);
        Ok(())
    }

    fn read_cell(&self, row: usize, column: usize) -> Result<Option<String>, StoreError> {
        Ok(row
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .and_then(|cells| cells.get(column))
            .cloned())
    }

    fn delete_row(&mut self, row: usize) -> Result<(), StoreError> {
        let index = data_row_index(&self.rows, row, 0)?;
        self.rows.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::from_rows(vec![
            vec!["Date", "Name", "Restaurant", "Amount"],
            vec!["2024-01-01", "Katy", "Ramen", "20"],
            vec!["2024-01-02", "Sebastien", "Pho"],
        ])
    }

    #[test]
    fn header_is_not_writable() {
        let mut store = store();
        assert!(matches!(
            store.update_cell(1, 0, "Day"),
            Err(StoreError::OutOfRange { row: 1, column: 0 })
        ));
        assert!(matches!(
            store.delete_row(1),
            Err(StoreError::OutOfRange { .. })
        ));
        assert!(matches!(
            store.update_cell(4, 0, "2024-01-03"),
            Err(StoreError::OutOfRange { .. })
        ));
        assert!(matches!(
            store.update_cell(2, 4, "x"),
            Err(StoreError::OutOfRange { .. })
        ));
    }

    #[test]
    fn update_pads_short_rows() {
        let mut store = store();
        store.update_cell(3, 3, "12.50").unwrap();
        assert_eq!(store.read_cell(3, 3).unwrap().as_deref(), Some("12.50"));
        assert_eq!(store.read_cell(9, 0).unwrap(), None);
    }

    #[test]
    fn delete_shifts_rows_up() {
        let mut store = store();
        store.delete_row(2).unwrap();
        assert_eq!(store.rows().len(), 2);
        assert_eq!(store.read_cell(2, 1).unwrap().as_deref(), Some("Sebastien"));
    }

    #[test]
    fn append_to_empty_store_writes_header() {
        let mut store = MemoryStore::default();
        store
            .append(&[
                "2024-01-01".to_string(),
                "Katy".to_string(),
                "Ramen".to_string(),
                "20".to_string(),
            ])
            .unwrap();
        assert_eq!(store.rows()[0], header_row());
        assert_eq!(store.rows().len(), 2);
    }
}
