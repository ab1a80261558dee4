//! Access to the responses table, one row per trainee submission.

use debrief_core::models::status::FeedbackStatus;
use debrief_core::models::submission::{NewSubmission, SubmissionRecord};
use debrief_core::schema::{TableSchema, responses::*};

use crate::error::StorageError;
use crate::table::{ColumnMap, Table};
use crate::workbook::Workbook;

fn record_from_row(
    cols: &ColumnMap,
    row_number: usize,
    row: &[String],
) -> Result<SubmissionRecord, StorageError> {
    Ok(SubmissionRecord {
        row: row_number,
        email: cols.cell(row, EMAIL)?.to_string(),
        patient: cols.cell(row, PATIENT)?.to_string(),
        impression: cols.cell(row, IMPRESSION)?.to_string(),
        plan: cols.cell(row, PLAN)?.to_string(),
        narrative_feedback: cols.cell(row, NARRATIVE_FEEDBACK)?.to_string(),
        feedback_email_status: cols.cell(row, FEEDBACK_EMAIL_STATUS)?.to_string(),
    })
}

fn read_checked(workbook: &dyn Workbook, table: &str) -> Result<(Table, ColumnMap), StorageError> {
    let sheet = workbook.read_table(table)?;
    let cols = sheet.columns(table, &TableSchema::responses())?;
    Ok((sheet, cols))
}

/// Read a single submission by row number.
pub fn read_submission(
    workbook: &dyn Workbook,
    table: &str,
    row: usize,
) -> Result<SubmissionRecord, StorageError> {
    let (sheet, cols) = read_checked(workbook, table)?;
    let cells = sheet.row(row).ok_or_else(|| StorageError::RowOutOfRange {
        table: table.to_string(),
        row,
    })?;
    record_from_row(&cols, row, cells)
}

/// Read every submission in row order.
pub fn read_submissions(
    workbook: &dyn Workbook,
    table: &str,
) -> Result<Vec<SubmissionRecord>, StorageError> {
    let (sheet, cols) = read_checked(workbook, table)?;
    sheet
        .data_rows()
        .map(|(n, row)| record_from_row(&cols, n, row))
        .collect()
}

/// Row number of the most recent submission, if any.
pub fn latest_row(workbook: &dyn Workbook, table: &str) -> Result<Option<usize>, StorageError> {
    let (sheet, _) = read_checked(workbook, table)?;
    Ok(sheet.last_row())
}

pub fn write_narrative(
    workbook: &dyn Workbook,
    table: &str,
    row: usize,
    narrative: &str,
) -> Result<(), StorageError> {
    workbook.write_cell(table, row, NARRATIVE_FEEDBACK, narrative)
}

pub fn write_status(
    workbook: &dyn Workbook,
    table: &str,
    row: usize,
    status: &FeedbackStatus,
) -> Result<(), StorageError> {
    workbook.write_cell(table, row, FEEDBACK_EMAIL_STATUS, &status.to_string())
}

/// Append a new submission with empty output columns.
pub fn append_submission(
    workbook: &dyn Workbook,
    table: &str,
    submission: &NewSubmission,
) -> Result<usize, StorageError> {
    // Validate the shape first so a bad table never gains a partial row.
    read_checked(workbook, table)?;
    let row = workbook.append_row(
        table,
        &[
            (EMAIL, submission.email.as_str()),
            (PATIENT, submission.patient.as_str()),
            (IMPRESSION, submission.impression.as_str()),
            (PLAN, submission.plan.as_str()),
        ],
    )?;
    tracing::info!(table, row, patient = %submission.patient, "submission appended");
    Ok(row)
}
