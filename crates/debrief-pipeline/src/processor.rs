use std::sync::Arc;

use debrief_core::models::status::FeedbackStatus;
use debrief_core::models::submission::SubmissionRecord;
use debrief_export::email::render_feedback_email;
use debrief_export::narrative::assemble_narrative;
use debrief_gemini::client::TextGenerator;
use debrief_gemini::prompt::{PromptInput, build_prompt};
use debrief_gemini::structured::request_structured_feedback;
use debrief_mail::{Mailer, OutgoingEmail};
use debrief_storage::cases::load_case_brief;
use debrief_storage::error::StorageError;
use debrief_storage::responses;
use debrief_storage::rubric::load_rubric;
use debrief_storage::workbook::Workbook;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{PipelineConfig, TableNames};
use crate::error::{ErrorKind, PipelineError};
use crate::inflight::InFlightRows;

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    Skipped { row: usize, reason: SkipReason },
    /// Narrative written; no email address or mail disabled.
    Ready { row: usize },
    /// Narrative written and emailed.
    Sent { row: usize, to: String },
    /// Processing failed and the row was marked `ERROR: <message>`.
    Failed {
        row: usize,
        kind: ErrorKind,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    AlreadyProcessed,
    InFlight,
}

/// Everything needed to turn a submission row into emailed feedback.
pub struct FeedbackPipeline {
    pub(crate) workbook: Arc<dyn Workbook>,
    pub(crate) model: Arc<dyn TextGenerator>,
    pub(crate) mailer: Option<Arc<dyn Mailer>>,
    pub(crate) config: PipelineConfig,
    pub(crate) in_flight: InFlightRows,
}

impl FeedbackPipeline {
    /// `mailer: None` disables notification; rows stop at `READY`.
    pub fn new(
        workbook: Arc<dyn Workbook>,
        model: Arc<dyn TextGenerator>,
        mailer: Option<Arc<dyn Mailer>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            workbook,
            model,
            mailer,
            config,
            in_flight: InFlightRows::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run a workbook operation on the blocking pool.
    ///
    /// Workbook backends do synchronous file I/O under a lock, which must
    /// not stall the async runtime.
    pub(crate) async fn storage<T, F>(&self, f: F) -> Result<T, PipelineError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Workbook, &TableNames) -> Result<T, StorageError> + Send + 'static,
    {
        let workbook = Arc::clone(&self.workbook);
        let tables = self.config.tables.clone();
        let result = tokio::task::spawn_blocking(move || f(workbook.as_ref(), &tables))
            .await
            .map_err(|e| PipelineError::StorageTask(e.to_string()))?;
        Ok(result?)
    }

    /// Read one submission row.
    pub async fn submission(&self, row: usize) -> Result<SubmissionRecord, PipelineError> {
        self.storage(move |wb, tables| responses::read_submission(wb, &tables.responses, row))
            .await
    }

    /// Generate, store and send feedback for one row.
    ///
    /// A row that already has a narrative is left untouched. Errors are
    /// returned to the caller without touching the row; the entry points
    /// decide whether to record them.
    pub async fn process_row(&self, row: usize) -> Result<RowOutcome, PipelineError> {
        let Some(_claim) = self.in_flight.try_claim(row) else {
            debug!(row, "row already in flight, skipping");
            return Ok(RowOutcome::Skipped {
                row,
                reason: SkipReason::InFlight,
            });
        };

        let record = self.submission(row).await?;
        if record.is_processed() {
            debug!(row, "row already has feedback, skipping");
            return Ok(RowOutcome::Skipped {
                row,
                reason: SkipReason::AlreadyProcessed,
            });
        }

        let patient = record.patient.clone();
        let (rubric, brief) = self
            .storage(move |wb, tables| {
                let rubric = load_rubric(wb, &tables.rubric)?;
                let brief = load_case_brief(wb, &tables.cases, &patient)?;
                Ok((rubric, brief))
            })
            .await?;

        info!(
            row,
            patient = %record.patient,
            catalogued = brief.catalogued,
            criteria = rubric.len(),
            model = self.model.model(),
            "generating feedback"
        );

        let prompt = build_prompt(&PromptInput {
            case_brief: brief.as_str(),
            impression: &record.impression,
            plan: &record.plan,
            rubric: &rubric,
        });
        let feedback = request_structured_feedback(
            self.model.as_ref(),
            &prompt,
            &rubric,
            self.config.max_model_attempts,
        )
        .await?;
        let narrative = assemble_narrative(&feedback);
        // A blank narrative would leave the row pending forever.
        if narrative.trim().is_empty() {
            return Err(PipelineError::EmptyNarrative);
        }

        let stored = narrative.clone();
        self.storage(move |wb, tables| {
            responses::write_narrative(wb, &tables.responses, row, &stored)?;
            responses::write_status(wb, &tables.responses, row, &FeedbackStatus::Ready)
        })
        .await?;

        let (Some(to), Some(mailer)) = (record.recipient(), &self.mailer) else {
            info!(row, "feedback ready");
            return Ok(RowOutcome::Ready { row });
        };

        let rendered =
            render_feedback_email(&self.config.email_subject_prefix, &record.patient, &narrative)?;
        mailer
            .send(&OutgoingEmail {
                to: to.to_string(),
                from: self.config.email_from.clone(),
                subject: rendered.subject,
                html_body: rendered.html_body,
                text_body: rendered.text_body,
            })
            .await?;
        self.storage(move |wb, tables| {
            responses::write_status(wb, &tables.responses, row, &FeedbackStatus::Sent)
        })
        .await?;

        info!(row, "feedback sent");
        Ok(RowOutcome::Sent {
            row,
            to: to.to_string(),
        })
    }
}
