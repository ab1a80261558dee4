use std::sync::Arc;

use debrief_core::schema::{cases, responses, rubric};
use debrief_gemini::client::GeminiClient;
use debrief_mail::Mailer;
use debrief_mail::outbox::OutboxMailer;
use debrief_mail::relay::RelayMailer;
use debrief_pipeline::{FeedbackPipeline, TableNames};
use debrief_storage::json_file::JsonWorkbook;
use debrief_storage::table::Table;
use debrief_storage::workbook::WorkbookData;
use eyre::WrapErr;

use crate::settings::{MailSettings, RELAY_TIMEOUT, Settings};

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<FeedbackPipeline>,
}

impl AppState {
    pub fn new(pipeline: FeedbackPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Wire the workbook, model client and mailer described by `settings`.
    pub fn from_settings(settings: &Settings) -> eyre::Result<Self> {
        let path = &settings.workbook_path;
        let workbook = if path.exists() {
            JsonWorkbook::open(path)
        } else {
            tracing::warn!(
                path = %path.display(),
                "workbook not found, creating one with empty tables"
            );
            JsonWorkbook::create(path, &starter_workbook(&settings.pipeline.tables))
        }
        .wrap_err_with(|| format!("cannot open workbook {}", path.display()))?;

        if settings.gemini.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; submissions will be marked ERROR");
        }
        let model = GeminiClient::new(settings.gemini.clone())?;

        let mailer: Option<Arc<dyn Mailer>> = match &settings.mail {
            MailSettings::Outbox { dir } => {
                tracing::info!(dir = %dir.display(), "feedback emails go to outbox");
                Some(Arc::new(OutboxMailer::new(dir.clone())))
            }
            MailSettings::Relay { url, token } => {
                tracing::info!(url = %url, "feedback emails go to mail relay");
                Some(Arc::new(RelayMailer::new(
                    url.clone(),
                    token.clone(),
                    RELAY_TIMEOUT,
                )?))
            }
            MailSettings::Disabled => {
                tracing::info!("email disabled; feedback stops at READY");
                None
            }
        };

        Ok(Self::new(FeedbackPipeline::new(
            Arc::new(workbook),
            Arc::new(model),
            mailer,
            settings.pipeline.clone(),
        )))
    }
}

/// Empty tables with the expected headers.
fn starter_workbook(tables: &TableNames) -> WorkbookData {
    WorkbookData::default()
        .with_table(&tables.responses, Table::new(responses::REQUIRED.iter().copied()))
        .with_table(&tables.rubric, Table::new(rubric::REQUIRED.iter().copied()))
        .with_table(&tables.cases, Table::new(cases::REQUIRED.iter().copied()))
}
