use std::collections::HashMap;

use debrief_core::schema::TableSchema;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Spreadsheet row number of the first data row (row 1 holds headers).
pub const FIRST_DATA_ROW: usize = 2;

/// A table with a header row and string cells.
///
/// Rows may be shorter than the header; missing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builder-style helper for tests and fixtures.
    pub fn with_row(mut self, cells: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Resolve every column in `schema` by header name.
    pub fn columns(&self, table: &str, schema: &TableSchema) -> Result<ColumnMap, StorageError> {
        let map = ColumnMap::from_headers(table, &self.headers);
        for column in schema.required {
            map.index(column)?;
        }
        Ok(map)
    }

    /// Data rows paired with their spreadsheet row numbers.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i + FIRST_DATA_ROW, r.as_slice()))
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        row.checked_sub(FIRST_DATA_ROW)
            .and_then(|i| self.rows.get(i))
            .map(Vec::as_slice)
    }

    /// Row number of the most recent data row.
    pub fn last_row(&self) -> Option<usize> {
        self.rows.len().checked_sub(1).map(|i| i + FIRST_DATA_ROW)
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> Option<&mut Vec<String>> {
        row.checked_sub(FIRST_DATA_ROW)
            .and_then(|i| self.rows.get_mut(i))
    }
}

/// Header name → column index for one table.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    table: String,
    indices: HashMap<String, usize>,
}

impl ColumnMap {
    pub fn from_headers(table: &str, headers: &[String]) -> Self {
        let mut indices = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            // First occurrence wins when a header is duplicated.
            indices.entry(h.trim().to_string()).or_insert(i);
        }
        Self {
            table: table.to_string(),
            indices,
        }
    }

    pub fn index(&self, column: &str) -> Result<usize, StorageError> {
        self.indices
            .get(column)
            .copied()
            .ok_or_else(|| StorageError::MissingColumn {
                table: self.table.clone(),
                column: column.to_string(),
            })
    }

    /// Cell text for `column` in `row`; short rows read as empty.
    pub fn cell<'a>(&self, row: &'a [String], column: &str) -> Result<&'a str, StorageError> {
        let i = self.index(column)?;
        Ok(row.get(i).map(String::as_str).unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: TableSchema = TableSchema {
        required: &["A", "B"],
    };

    #[test]
    fn headers_are_matched_after_trimming() {
        let table = Table::new([" B ", "A"]).with_row(["b1", "a1"]);
        let cols = table.columns("demo", &SCHEMA).unwrap();
        let row = table.row(2).unwrap();
        assert_eq!(cols.cell(row, "A").unwrap(), "a1");
        assert_eq!(cols.cell(row, "B").unwrap(), "b1");
    }

    #[test]
    fn missing_required_column_fails_fast() {
        let table = Table::new(["A"]);
        let err = table.columns("demo", &SCHEMA).unwrap_err();
        assert!(matches!(
            err,
            StorageError::MissingColumn { ref column, .. } if column == "B"
        ));
    }

    #[test]
    fn short_rows_read_as_empty() {
        let table = Table::new(["A", "B"]).with_row(["only a"]);
        let cols = table.columns("demo", &SCHEMA).unwrap();
        assert_eq!(cols.cell(table.row(2).unwrap(), "B").unwrap(), "");
    }

    #[test]
    fn row_numbers_start_after_header() {
        let table = Table::new(["A"]).with_row(["x"]).with_row(["y"]);
        assert!(table.row(1).is_none());
        assert_eq!(table.row(3).unwrap()[0], "y");
        assert_eq!(table.last_row(), Some(3));
        assert_eq!(Table::new(["A"]).last_row(), None);
        let numbers: Vec<_> = table.data_rows().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![2, 3]);
    }
}
