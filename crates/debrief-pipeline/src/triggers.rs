//! Entry points: a row event, the periodic sweep, and the manual
//! most-recent-row run.

use debrief_core::models::status::FeedbackStatus;
use debrief_core::models::submission::NewSubmission;
use debrief_storage::responses;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::SweepErrorPolicy;
use crate::error::{ErrorKind, PipelineError};
use crate::processor::{FeedbackPipeline, RowOutcome};

/// Summary of one sweep pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Rows in the responses table.
    pub scanned: usize,
    /// Rows with a plan and no narrative when the sweep started.
    pub pending: usize,
    pub ready: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: Vec<SweepFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    pub row: usize,
    pub kind: ErrorKind,
    pub message: String,
}

impl SweepReport {
    fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Ready { .. } => self.ready += 1,
            RowOutcome::Sent { .. } => self.sent += 1,
            RowOutcome::Skipped { .. } => self.skipped += 1,
            RowOutcome::Failed { row, kind, message } => self.failed.push(SweepFailure {
                row: *row,
                kind: *kind,
                message: message.clone(),
            }),
        }
    }
}

impl FeedbackPipeline {
    /// Process a row named by an append event, recording any failure on
    /// the row as `ERROR: <message>` instead of returning it.
    pub async fn handle_row_event(&self, row: usize) -> RowOutcome {
        match self.process_row(row).await {
            Ok(outcome) => outcome,
            Err(e) => self.mark_failed(row, &e).await,
        }
    }

    /// Append a form submission and process it as a row event.
    pub async fn submit(&self, submission: &NewSubmission) -> Result<RowOutcome, PipelineError> {
        let submission = submission.clone();
        let row = self
            .storage(move |wb, tables| {
                responses::append_submission(wb, &tables.responses, &submission)
            })
            .await?;
        Ok(self.handle_row_event(row).await)
    }

    /// Process the most recent submission, for manual testing.
    ///
    /// Errors are returned to the caller and not written to the row.
    /// Returns `None` when the table has no submissions.
    pub async fn process_latest(&self) -> Result<Option<RowOutcome>, PipelineError> {
        let latest = self
            .storage(|wb, tables| responses::latest_row(wb, &tables.responses))
            .await?;
        let Some(row) = latest else {
            info!("no submissions to process");
            return Ok(None);
        };
        self.process_row(row).await.map(Some)
    }

    /// Process every row with a plan and no narrative, in row order.
    ///
    /// Waits `sweep_delay` between model calls. A failing row is marked
    /// `ERROR: <message>`; whether the sweep then stops depends on
    /// [`SweepErrorPolicy`].
    pub async fn sweep(&self) -> Result<SweepReport, PipelineError> {
        let records = self
            .storage(|wb, tables| responses::read_submissions(wb, &tables.responses))
            .await?;
        let pending: Vec<usize> = records
            .iter()
            .filter(|r| r.is_pending())
            .map(|r| r.row)
            .collect();

        let mut report = SweepReport {
            scanned: records.len(),
            pending: pending.len(),
            ..SweepReport::default()
        };
        info!(scanned = report.scanned, pending = report.pending, "sweep started");

        let delay = self.config.sweep_delay;
        let mut called_model = false;
        for row in pending {
            if called_model && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.process_row(row).await {
                Ok(outcome) => {
                    called_model = !matches!(outcome, RowOutcome::Skipped { .. });
                    report.record(&outcome);
                }
                Err(e) => {
                    called_model = true;
                    let outcome = self.mark_failed(row, &e).await;
                    if self.config.sweep_error_policy == SweepErrorPolicy::Abort {
                        warn!(row, ?report, "sweep aborted");
                        return Err(PipelineError::SweepAborted {
                            row,
                            source: Box::new(e),
                        });
                    }
                    report.record(&outcome);
                }
            }
        }

        info!(
            ready = report.ready,
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed.len(),
            "sweep finished"
        );
        Ok(report)
    }

    async fn mark_failed(&self, row: usize, e: &PipelineError) -> RowOutcome {
        let kind = e.kind();
        let message = e.to_string();
        error!(row, ?kind, error = %message, "feedback generation failed");

        let status = FeedbackStatus::error(message.clone());
        let written = self
            .storage(move |wb, tables| responses::write_status(wb, &tables.responses, row, &status))
            .await;
        if let Err(write_err) = written {
            error!(row, error = %write_err, "could not record failure on row");
        }

        RowOutcome::Failed { row, kind, message }
    }
}
