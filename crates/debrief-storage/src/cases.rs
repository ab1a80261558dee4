use debrief_core::models::case::CaseBrief;
use debrief_core::schema::{TableSchema, cases};

use crate::error::StorageError;
use crate::workbook::Workbook;

/// Look up the case brief for `patient_id`.
///
/// An uncatalogued case is not an error: the brief falls back to
/// [`CaseBrief::placeholder`]. Errors are reserved for an unreadable or
/// misshapen case table.
pub fn load_case_brief(
    workbook: &dyn Workbook,
    table: &str,
    patient_id: &str,
) -> Result<CaseBrief, StorageError> {
    let sheet = workbook.read_table(table)?;
    let cols = sheet.columns(table, &TableSchema::cases())?;
    let wanted = patient_id.trim();

    for (_, row) in sheet.data_rows() {
        if cols.cell(row, cases::PATIENT_ID)?.trim() != wanted {
            continue;
        }
        let mut fields = Vec::with_capacity(cases::BRIEF_FIELDS.len());
        for name in cases::BRIEF_FIELDS {
            fields.push((*name, cols.cell(row, name)?));
        }
        return Ok(CaseBrief::from_fields(patient_id, fields));
    }

    tracing::info!(patient_id, "no case context found, using placeholder");
    Ok(CaseBrief::placeholder(patient_id))
}
