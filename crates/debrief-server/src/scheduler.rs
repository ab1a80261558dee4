//! Periodic sweep task.

use std::sync::Arc;
use std::time::Duration;

use debrief_pipeline::FeedbackPipeline;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Run a sweep every `every`, starting immediately. A slow sweep delays the
/// next tick instead of stacking passes.
pub fn spawn_sweeper(pipeline: Arc<FeedbackPipeline>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match pipeline.sweep().await {
                Ok(report) if report.pending > 0 => {
                    tracing::info!(
                        pending = report.pending,
                        failed = report.failed.len(),
                        "scheduled sweep done"
                    );
                }
                Ok(_) => tracing::debug!("scheduled sweep found nothing to do"),
                Err(e) => tracing::error!(kind = ?e.kind(), error = %e, "scheduled sweep failed"),
            }
        }
    })
}
