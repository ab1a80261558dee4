//! debrief-server
//!
//! HTTP surface for the feedback pipeline: submission events, manual runs,
//! on-demand sweeps, plus the periodic sweep task.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod scheduler;
pub mod settings;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/submissions", post(routes::submissions::create_submission))
        .route(
            "/submissions/latest/process",
            post(routes::submissions::process_latest),
        )
        .route("/submissions/{row}", get(routes::submissions::get_submission))
        .route(
            "/submissions/{row}/process",
            post(routes::submissions::process_submission),
        )
        .route("/sweep", post(routes::sweep::run_sweep))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
