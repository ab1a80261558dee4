//! Workbook persisted as a single JSON document.
//!
//! The file is re-read on every call so edits made by other tools between
//! calls are visible. Writes go to a sibling temp file that is then renamed
//! over the original.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;
use crate::table::Table;
use crate::workbook::{Workbook, WorkbookData};

#[derive(Debug)]
pub struct JsonWorkbook {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonWorkbook {
    /// Open an existing workbook file, checking that it parses.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let workbook = Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        };
        let data = workbook.load()?;
        tracing::info!(
            path = %workbook.path.display(),
            tables = data.tables.len(),
            "workbook opened"
        );
        Ok(workbook)
    }

    /// Write `data` to `path`, replacing any existing file, and open it.
    pub fn create(path: impl Into<PathBuf>, data: &WorkbookData) -> Result<Self, StorageError> {
        let path = path.into();
        save(&path, data)?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<WorkbookData, StorageError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn modify<T>(
        &self,
        f: impl FnOnce(&mut WorkbookData) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut data = self.load()?;
        let out = f(&mut data)?;
        save(&self.path, &data)?;
        Ok(out)
    }
}

impl Workbook for JsonWorkbook {
    fn read_table(&self, table: &str) -> Result<Table, StorageError> {
        let data = self.load()?;
        data.table(table).cloned()
    }

    fn write_cell(
        &self,
        table: &str,
        row: usize,
        column: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        self.modify(|data| data.set_cell(table, row, column, value))
    }

    fn append_row(&self, table: &str, values: &[(&str, &str)]) -> Result<usize, StorageError> {
        self.modify(|data| data.push_row(table, values))
    }
}

fn save(path: &Path, data: &WorkbookData) -> Result<(), StorageError> {
    let io_err = |source: std::io::Error| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(data)?;
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, json.as_bytes()).map_err(io_err)?;

    // Submissions carry trainee emails; keep the file private on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
            .map_err(io_err)?;
    }

    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    tracing::debug!(path = %path.display(), "workbook saved");
    Ok(())
}
