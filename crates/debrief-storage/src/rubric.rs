use debrief_core::models::rubric::RubricItem;
use debrief_core::schema::{self, TableSchema};

use crate::error::StorageError;
use crate::workbook::Workbook;

/// Load every criterion from the rubric table.
///
/// Rows with a blank `Criterion` cell are skipped. All rubric columns must
/// be present, otherwise nothing is loaded.
pub fn load_rubric(workbook: &dyn Workbook, table: &str) -> Result<Vec<RubricItem>, StorageError> {
    use schema::rubric::*;

    let sheet = workbook.read_table(table)?;
    let cols = sheet.columns(table, &TableSchema::rubric())?;

    let mut items = Vec::new();
    for (_, row) in sheet.data_rows() {
        let criterion = cols.cell(row, CRITERION)?;
        if criterion.trim().is_empty() {
            continue;
        }
        items.push(RubricItem::from_cells(
            criterion,
            cols.cell(row, PURPOSE)?,
            cols.cell(row, GOOD_EVIDENCE)?,
            cols.cell(row, PITFALLS)?,
            cols.cell(row, FEEDBACK_STEMS)?,
        ));
    }

    tracing::debug!(table, criteria = items.len(), "rubric loaded");
    Ok(items)
}
