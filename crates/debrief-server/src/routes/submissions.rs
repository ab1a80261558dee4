use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use debrief_core::models::status::FeedbackStatus;
use debrief_core::models::submission::{NewSubmission, SubmissionRecord};
use debrief_pipeline::RowOutcome;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// A stored submission with its status cell parsed. `status` is `null`
/// for unprocessed rows and for cells holding text the system never writes.
#[derive(Serialize)]
pub struct SubmissionView {
    #[serde(flatten)]
    pub record: SubmissionRecord,
    pub status: Option<FeedbackStatus>,
}

/// Form-submission event: append the row, then process it.
pub async fn create_submission(
    State(state): State<AppState>,
    Json(submission): Json<NewSubmission>,
) -> Result<(StatusCode, Json<RowOutcome>), ApiError> {
    if submission.patient.trim().is_empty() {
        return Err(ApiError::BadRequest("patient is required".to_string()));
    }
    let outcome = state.pipeline.submit(&submission).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn get_submission(
    State(state): State<AppState>,
    Path(row): Path<usize>,
) -> Result<Json<SubmissionView>, ApiError> {
    let record = state.pipeline.submission(row).await?;
    let status = FeedbackStatus::from_cell(&record.feedback_email_status)
        .ok()
        .flatten();
    Ok(Json(SubmissionView { record, status }))
}

/// Event-driven processing of an existing row. Failures are recorded on
/// the row and reported in the outcome, not as an HTTP error.
pub async fn process_submission(
    State(state): State<AppState>,
    Path(row): Path<usize>,
) -> Result<Json<RowOutcome>, ApiError> {
    let pipeline = &state.pipeline;
    // Unknown rows are a 404 rather than an ERROR written nowhere.
    pipeline.submission(row).await?;
    Ok(Json(pipeline.handle_row_event(row).await))
}

/// Manual run on the most recent row. `null` when there are no rows.
pub async fn process_latest(
    State(state): State<AppState>,
) -> Result<Json<Option<RowOutcome>>, ApiError> {
    let outcome = state.pipeline.process_latest().await?;
    Ok(Json(outcome))
}
