use axum::Json;
use axum::extract::State;
use debrief_pipeline::SweepReport;

use crate::error::ApiError;
use crate::state::AppState;

/// Run one sweep pass now.
pub async fn run_sweep(State(state): State<AppState>) -> Result<Json<SweepReport>, ApiError> {
    let report = state.pipeline.sweep().await?;
    Ok(Json(report))
}
