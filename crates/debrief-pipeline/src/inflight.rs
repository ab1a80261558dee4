use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Rows currently being processed in this process.
///
/// Stops the row-event path and a concurrent sweep from handling the same
/// row twice. It does nothing for other processes sharing the workbook.
#[derive(Debug, Default)]
pub struct InFlightRows {
    rows: Mutex<HashSet<usize>>,
}

impl InFlightRows {
    /// Claim `row`, or `None` if another task holds it. The claim is released
    /// when the returned guard drops.
    pub fn try_claim(&self, row: usize) -> Option<RowClaim<'_>> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        rows.insert(row).then(|| RowClaim { owner: self, row })
    }
}

#[derive(Debug)]
pub struct RowClaim<'a> {
    owner: &'a InFlightRows,
    row: usize,
}

impl Drop for RowClaim<'_> {
    fn drop(&mut self) {
        self.owner
            .rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.row);
    }
}
