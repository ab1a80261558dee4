use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("row {row} does not exist in {table}")]
    RowOutOfRange { table: String, row: usize },

    #[error("failed to access workbook at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("workbook lock poisoned")]
    Poisoned,
}

impl StorageError {
    /// True for errors caused by the workbook's shape rather than by I/O:
    /// a table or column the system expects is not there.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StorageError::TableNotFound { .. } | StorageError::MissingColumn { .. }
        )
    }
}
