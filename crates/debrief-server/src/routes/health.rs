use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    sweep_error_policy: debrief_pipeline::SweepErrorPolicy,
}

pub async fn health_check(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        sweep_error_policy: state.pipeline.config().sweep_error_policy,
    })
}
