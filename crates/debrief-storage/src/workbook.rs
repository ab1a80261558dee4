use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::table::{ColumnMap, Table};

/// A set of named tables addressed by header name.
///
/// Implementations must be safe to share across tasks; each call is
/// independent and there is no transaction spanning calls. Calls may block
/// on file I/O, so async callers should run them on a blocking thread.
pub trait Workbook: Send + Sync {
    /// Snapshot of a whole table.
    fn read_table(&self, table: &str) -> Result<Table, StorageError>;

    /// Overwrite one cell. Short rows are padded with empty cells.
    fn write_cell(
        &self,
        table: &str,
        row: usize,
        column: &str,
        value: &str,
    ) -> Result<(), StorageError>;

    /// Append a row built from `(column, value)` pairs; unnamed columns are
    /// left empty. Returns the new row number.
    fn append_row(&self, table: &str, values: &[(&str, &str)]) -> Result<usize, StorageError>;
}

/// Serializable contents of a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbookData {
    #[serde(default)]
    pub tables: BTreeMap<String, Table>,
}

impl WorkbookData {
    pub fn with_table(mut self, name: &str, table: Table) -> Self {
        self.tables.insert(name.to_string(), table);
        self
    }

    pub fn table(&self, name: &str) -> Result<&Table, StorageError> {
        self.tables
            .get(name)
            .ok_or_else(|| StorageError::TableNotFound {
                table: name.to_string(),
            })
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table, StorageError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| StorageError::TableNotFound {
                table: name.to_string(),
            })
    }

    pub fn set_cell(
        &mut self,
        table: &str,
        row: usize,
        column: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        let t = self.table_mut(table)?;
        let index = ColumnMap::from_headers(table, &t.headers).index(column)?;
        let width = t.headers.len();
        let cells = t.row_mut(row).ok_or_else(|| StorageError::RowOutOfRange {
            table: table.to_string(),
            row,
        })?;
        if cells.len() < width {
            cells.resize(width, String::new());
        }
        cells[index] = value.to_string();
        Ok(())
    }

    pub fn push_row(&mut self, table: &str, values: &[(&str, &str)]) -> Result<usize, StorageError> {
        let t = self.table_mut(table)?;
        let columns = ColumnMap::from_headers(table, &t.headers);
        let mut cells = vec![String::new(); t.headers.len()];
        for (column, value) in values {
            cells[columns.index(column)?] = (*value).to_string();
        }
        t.rows.push(cells);
        // A row was just pushed, so there is a last row.
        Ok(t.last_row().unwrap_or_default())
    }
}

/// Workbook held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryWorkbook {
    data: RwLock<WorkbookData>,
}

impl MemoryWorkbook {
    pub fn new(data: WorkbookData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Result<WorkbookData, StorageError> {
        self.data
            .read()
            .map(|d| d.clone())
            .map_err(|_| StorageError::Poisoned)
    }
}

impl Workbook for MemoryWorkbook {
    fn read_table(&self, table: &str) -> Result<Table, StorageError> {
        let data = self.data.read().map_err(|_| StorageError::Poisoned)?;
        data.table(table).cloned()
    }

    fn write_cell(
        &self,
        table: &str,
        row: usize,
        column: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        let mut data = self.data.write().map_err(|_| StorageError::Poisoned)?;
        data.set_cell(table, row, column, value)
    }

    fn append_row(&self, table: &str, values: &[(&str, &str)]) -> Result<usize, StorageError> {
        let mut data = self.data.write().map_err(|_| StorageError::Poisoned)?;
        data.push_row(table, values)
    }
}
